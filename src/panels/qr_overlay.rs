use super::{ModuleKind, PanelContext, EPISODE_NUMBER_INVALID};
use crate::error::AppError;
use crate::forms::{require_positive_int, FieldErrors, FormState, SubmissionState};
use crate::store::EpisodeContext;
use reqwest::Url;
use serde::Serialize;

const CUSTOM_URL_MISSING: &str = "A custom URL must be provided.";
const CUSTOM_URL_INVALID: &str = "The custom URL must be a valid http(s) address.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkDestination {
    ReformForm,
    SponsorGrid,
    Curriculum,
    Custom,
}

impl LinkDestination {
    fn path(self) -> Option<&'static str> {
        match self {
            Self::ReformForm => Some("reform-form"),
            Self::SponsorGrid => Some("sponsor-grid"),
            Self::Curriculum => Some("curriculum"),
            Self::Custom => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrForm {
    pub episode_number: String,
    pub destination: LinkDestination,
    pub custom_url: String,
    pub cta_english: String,
    pub cta_bangla: String,
}

impl Default for QrForm {
    fn default() -> Self {
        Self {
            episode_number: "42".to_string(),
            destination: LinkDestination::ReformForm,
            custom_url: String::new(),
            cta_english: "Scan for Civic Action".to_string(),
            cta_bangla: "নাগরিক কর্মের জন্য স্ক্যান করুন".to_string(),
        }
    }
}

impl QrForm {
    pub fn prefilled(episode: &EpisodeContext) -> Self {
        let mut form = Self::default();
        if let Some(ep) = episode.get() {
            form.episode_number = ep.ep_number.clone();
        }
        form
    }

    pub fn target_url(&self) -> String {
        match self.destination.path() {
            Some(path) => format!("https://example.com/{}/ep{}", path, self.episode_number.trim()),
            None => self.custom_url.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrOverlay {
    pub image_url: String,
    pub target_url: String,
    pub cta_english: String,
    pub cta_bangla: String,
    pub episode_number: String,
}

pub struct QrPanel {
    ctx: PanelContext,
    form: FormState<QrOverlay>,
}

impl QrPanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::QrOverlayGenerator.id(), ctx.error_log.clone());
        Self { ctx, form }
    }

    pub fn default_form(&self) -> QrForm {
        QrForm::prefilled(&self.ctx.episode)
    }

    pub fn state(&self) -> SubmissionState<QrOverlay> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    pub fn edited(&self, field: &str) {
        self.form.clear_field_error(field);
        self.form.reset();
    }

    pub async fn submit(&self, input: &QrForm) -> Result<QrOverlay, AppError> {
        let target_url = self.form.check(|errors| {
            let ep = require_positive_int(errors, "episode_number", &input.episode_number, EPISODE_NUMBER_INVALID);
            if input.destination == LinkDestination::Custom {
                let custom = input.custom_url.trim();
                if custom.is_empty() {
                    errors.insert("custom_url", CUSTOM_URL_MISSING);
                } else if !matches!(Url::parse(custom), Ok(url) if url.scheme() == "http" || url.scheme() == "https") {
                    errors.insert("custom_url", CUSTOM_URL_INVALID);
                }
            }
            ep.map(|_| input.target_url())
        })?;

        self.form
            .run(async {
                let image_url = self.ctx.services.qr.render(&target_url).await?;
                log::info!("QR overlay generated for Episode {}", input.episode_number.trim());
                Ok::<_, AppError>(QrOverlay {
                    image_url,
                    target_url: target_url.clone(),
                    cta_english: input.cta_english.clone(),
                    cta_bangla: input.cta_bangla.clone(),
                    episode_number: input.episode_number.trim().to_string(),
                })
            })
            .await
    }
}
