use super::{ModuleKind, PanelContext};
use crate::error::AppError;
use crate::forms::{require_text, FieldErrors, FormState, SubmissionState};
use crate::store::models::{BundleOutcome, Playlist};
use crate::store::EpisodeContext;
use std::sync::Arc;

const FALLBACK_EPISODE_ID: &str = "Ep56_CivicTech";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleForm {
    pub playlist_id: String,
    pub episode_id: String,
}

impl BundleForm {
    /// `Ep{n}_{title}` from the active episode, else a fixed fallback.
    pub fn prefilled(episode: &EpisodeContext, playlist_id: &str) -> Self {
        let episode_id = episode
            .get()
            .map(|ep| format!("Ep{}_{}", ep.ep_number, ep.title))
            .unwrap_or_else(|| FALLBACK_EPISODE_ID.to_string());
        Self {
            playlist_id: playlist_id.to_string(),
            episode_id,
        }
    }
}

pub struct PlaylistPanel {
    ctx: PanelContext,
    form: FormState<BundleOutcome>,
}

impl PlaylistPanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::PlaylistBundler.id(), ctx.error_log.clone());
        Self { ctx, form }
    }

    pub fn playlists(&self) -> Arc<Vec<Playlist>> {
        self.ctx.playlists.snapshot()
    }

    /// Form preset to the first playlist and the active episode.
    pub fn default_form(&self) -> BundleForm {
        let first = self
            .playlists()
            .first()
            .map(|p| p.id.clone())
            .unwrap_or_default();
        BundleForm::prefilled(&self.ctx.episode, &first)
    }

    pub fn state(&self) -> SubmissionState<BundleOutcome> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    pub fn submit(&self, input: &BundleForm) -> Result<BundleOutcome, AppError> {
        let (playlist_id, episode_id) = self.form.check(|errors| {
            let playlist = require_text(errors, "playlist_id", &input.playlist_id, "A playlist must be selected.");
            let episode = require_text(errors, "episode_id", &input.episode_id, "An episode ID is required.");
            Some((playlist?, episode?))
        })?;

        self.form
            .complete(self.ctx.playlists.bundle(&playlist_id, &episode_id))
    }
}
