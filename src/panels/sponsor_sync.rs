use super::{ModuleKind, PanelContext};
use crate::error::AppError;
use crate::forms::{read_lock, require_episode_digits, require_text, write_lock, FieldErrors, FormState, SubmissionState};
use crate::services::dash_whitespace;
use crate::store::models::{Sponsor, SponsorStatus};
use serde::Serialize;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorLinkForm {
    pub sponsor_id: String,
    pub episode_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub link: String,
    pub qr_url: String,
    pub sponsor_name: String,
}

/// `https://example.com/onboard/{name}/{linkedEpisode}` with whitespace
/// runs in the name replaced by `-`.
pub fn onboarding_link(sponsor: &Sponsor) -> String {
    format!(
        "https://example.com/onboard/{}/{}",
        dash_whitespace(&sponsor.name),
        sponsor.linked_episode.as_deref().unwrap_or_default()
    )
}

pub struct SponsorSyncPanel {
    ctx: PanelContext,
    form: FormState<SyncResult>,
    grid: RwLock<Arc<Vec<Sponsor>>>,
}

impl SponsorSyncPanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::SponsorGridSync.id(), ctx.error_log.clone());
        Self {
            ctx,
            form,
            grid: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Grid as last loaded or returned by a link.
    pub fn sponsors(&self) -> Arc<Vec<Sponsor>> {
        read_lock(&self.grid).clone()
    }

    pub async fn load(&self) -> Result<Arc<Vec<Sponsor>>, AppError> {
        match self.ctx.services.sponsors.list().await {
            Ok(sponsors) => {
                *write_lock(&self.grid) = sponsors.clone();
                Ok(sponsors)
            }
            Err(e) => {
                self.ctx
                    .error_log
                    .log_error(ModuleKind::SponsorGridSync.id(), "Failed to fetch sponsor grid.", Some(&e.to_string()));
                Err(e)
            }
        }
    }

    /// First pending sponsor (else the first sponsor) and the active episode.
    pub fn default_form(&self) -> SponsorLinkForm {
        let grid = self.sponsors();
        let sponsor_id = grid
            .iter()
            .find(|s| s.status == SponsorStatus::Pending)
            .or_else(|| grid.first())
            .map(|s| s.id.clone())
            .unwrap_or_default();
        let episode_number = self
            .ctx
            .episode
            .get()
            .map(|ep| ep.ep_number.clone())
            .unwrap_or_else(|| "57".to_string());
        SponsorLinkForm {
            sponsor_id,
            episode_number,
        }
    }

    pub fn state(&self) -> SubmissionState<SyncResult> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    pub async fn submit(&self, input: &SponsorLinkForm) -> Result<SyncResult, AppError> {
        let (sponsor_id, episode_number) = self.form.check(|errors| {
            let sponsor = require_text(errors, "sponsor_id", &input.sponsor_id, "A sponsor must be selected.");
            let ep = require_episode_digits(errors, "episode_number", &input.episode_number, "Episode number is required.");
            Some((sponsor?, ep?))
        })?;

        self.form
            .run(async {
                let updated = self.ctx.services.sponsors.link(&sponsor_id, &episode_number).await?;
                *write_lock(&self.grid) = updated.clone();

                let sponsor = updated
                    .iter()
                    .find(|s| s.id == sponsor_id)
                    .ok_or_else(|| AppError::NotFound("Sponsor not found after update.".to_string()))?;

                let link = onboarding_link(sponsor);
                let qr_url = self.ctx.services.qr.render(&link).await?;

                Ok::<_, AppError>(SyncResult {
                    link,
                    qr_url,
                    sponsor_name: sponsor.name.clone(),
                })
            })
            .await
    }
}
