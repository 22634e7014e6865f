use super::{ModuleKind, PanelContext, EPISODE_NUMBER_INVALID};
use crate::error::AppError;
use crate::forms::{require_positive_int, require_text, split_list, FieldErrors, FormState, SubmissionState};
use crate::store::models::{EpisodeDetails, Language};
use chrono::Utc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionForm {
    pub ep_number: String,
    pub title: String,
    pub lang: Language,
    pub date: String,
    pub theme: String,
    /// Comma separated.
    pub tags: String,
}

impl Default for DescriptionForm {
    fn default() -> Self {
        Self {
            ep_number: "42".to_string(),
            title: "FoodSafety".to_string(),
            lang: Language::Bn,
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            theme: "Food Safety Detection and Citizen Nourishment".to_string(),
            tags: "GNLegacy, Cycle2, FoodSafety, DiasporaJustice".to_string(),
        }
    }
}

pub struct DescriptionPanel {
    ctx: PanelContext,
    form: FormState<String>,
}

impl DescriptionPanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::DescriptionEncoder.id(), ctx.error_log.clone());
        Self { ctx, form }
    }

    pub fn default_form(&self) -> DescriptionForm {
        let mut form = DescriptionForm::default();
        if let Some(ep) = self.ctx.episode.get() {
            form.ep_number = ep.ep_number.clone();
            form.title = ep.title.clone();
        }
        form
    }

    pub fn state(&self) -> SubmissionState<String> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    /// Generated text. Backend failures arrive as a readable message in
    /// the success slot, never as an error.
    pub async fn generate(&self, input: &DescriptionForm) -> Result<String, AppError> {
        let details = self.form.check(|errors| {
            let ep = require_positive_int(errors, "ep_number", &input.ep_number, EPISODE_NUMBER_INVALID);
            let title = require_text(errors, "title", &input.title, "Title is required.");
            Some(EpisodeDetails {
                ep_number: ep?.to_string(),
                title: title?,
                lang: input.lang,
                date: input.date.trim().to_string(),
                theme: input.theme.trim().to_string(),
                tags: split_list(&input.tags),
            })
        })?;

        self.form
            .run(async {
                Ok::<_, AppError>(self.ctx.services.descriptions.generate_description(&details).await)
            })
            .await
    }
}
