use super::{ModuleKind, PanelContext, EPISODE_NUMBER_INVALID};
use crate::error::AppError;
use crate::forms::{require_positive_int, require_present, require_text, split_list, FieldErrors, FormState, SubmissionState};
use crate::services::{UploadMetadata, UploadReceipt, VideoFile};
use crate::store::models::{ActiveEpisode, Language};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

/// Upload form input. Owned by the caller and passed in on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    pub ep_number: String,
    pub title: String,
    pub lang: Language,
    pub date: String,
    pub description: String,
    pub tags: String,
    pub file: Option<VideoFile>,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self {
            ep_number: "56".to_string(),
            title: "CivicTechIntegration".to_string(),
            lang: Language::En,
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            description: "Episode 56: Deep dive into the integration of civic technology platforms for transparent governance. #GNLegacy #Cycle3 #CivicTech".to_string(),
            tags: "GN AI, Civic Tech, Cycle 3, Governance, Transparency, EN, QR Broadcast".to_string(),
            file: None,
        }
    }
}

fn publish_filename(ep_number: &str, title: &str, date: &str, lang: &str) -> String {
    format!("GN-Ep{}-{}-{}-{}-QR.mp4", ep_number, title, date, lang)
}

impl UploadForm {
    /// Canonical publish filename, shown once a file is chosen. The episode
    /// number is normalized the same way a submission normalizes it.
    pub fn preview_filename(&self) -> String {
        if self.file.is_none() {
            return "No file selected".to_string();
        }
        let ep = self.ep_number.trim();
        let ep = ep.parse::<u32>().map(|n| n.to_string()).unwrap_or_else(|_| ep.to_string());
        publish_filename(&ep, self.title.trim(), self.date.trim(), &self.lang.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub filename: String,
    pub video_id: String,
    pub watch_url: String,
}

pub struct UploadPanel {
    ctx: PanelContext,
    form: FormState<UploadOutcome>,
}

impl UploadPanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::UploadManager.id(), ctx.error_log.clone());
        Self { ctx, form }
    }

    pub fn state(&self) -> SubmissionState<UploadOutcome> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    /// Called when the user edits `field`.
    pub fn edited(&self, field: &str) {
        self.form.clear_field_error(field);
        self.form.reset();
    }

    /// Returns the file, the metadata sent to the service and the publish
    /// filename built from that metadata.
    fn validate(&self, input: &UploadForm) -> Result<(VideoFile, UploadMetadata, String), AppError> {
        self.form.check(|errors| {
            let ep = require_positive_int(errors, "ep_number", &input.ep_number, EPISODE_NUMBER_INVALID);
            let title = require_text(errors, "title", &input.title, "Title is required.");
            let date = require_text(errors, "date", &input.date, "Date is required.")
                .filter(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").is_ok());
            if date.is_none() {
                errors.insert("date", "Date is required.");
            }
            let description = require_text(errors, "description", &input.description, "Description is required.");
            let tags = split_list(&input.tags);
            if tags.is_empty() {
                errors.insert("tags", "At least one tag is required.");
            }
            let file = require_present(errors, "file", input.file.as_ref(), "A video file must be selected for upload.");

            let metadata = UploadMetadata {
                ep_number: ep?.to_string(),
                title: title?,
                lang: input.lang.to_string(),
                description: description?,
                tags,
            };
            let filename = publish_filename(&metadata.ep_number, &metadata.title, &date?, &metadata.lang);
            Some((file?.clone(), metadata, filename))
        })
    }

    /// Validate, upload, and on success make the episode the active context.
    pub async fn submit(&self, input: &UploadForm) -> Result<UploadOutcome, AppError> {
        let (file, metadata, filename) = self.validate(input)?;

        self.form
            .run(async {
                let UploadReceipt { video_id, watch_url } =
                    self.ctx.services.upload.upload(&file, &metadata).await?;

                self.ctx.episode.set(ActiveEpisode {
                    ep_number: metadata.ep_number.clone(),
                    title: metadata.title.clone(),
                    external_video_id: video_id.clone(),
                });

                Ok::<_, AppError>(UploadOutcome {
                    filename,
                    video_id,
                    watch_url,
                })
            })
            .await
    }
}
