use super::{ModuleKind, PanelContext};
use crate::error::AppError;
use crate::forms::{require_episode_digits, split_list, FieldErrors, FormState, ProgressLog, SubmissionState};
use crate::services::{ArchivePayload, ArchiveResult};
use tokio::sync::mpsc;

pub const VAULT_THEMES: [&str; 5] = [
    "Civic Tech",
    "Food Safety",
    "Diaspora Justice",
    "Constitutional Reform",
    "Sponsor Onboarding",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveForm {
    pub episode_number: String,
    pub theme: String,
    pub tags: String,
}

impl Default for ArchiveForm {
    fn default() -> Self {
        Self {
            episode_number: "57".to_string(),
            theme: VAULT_THEMES[0].to_string(),
            tags: "GNLegacy, Cycle3, CivicTech, Vaulted".to_string(),
        }
    }
}

pub struct ArchivePanel {
    ctx: PanelContext,
    form: FormState<ArchiveResult>,
    log: ProgressLog<String>,
}

impl ArchivePanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::ArchiveToVault.id(), ctx.error_log.clone());
        Self {
            ctx,
            form,
            log: ProgressLog::new(),
        }
    }

    pub fn default_form(&self) -> ArchiveForm {
        let mut form = ArchiveForm::default();
        if let Some(ep) = self.ctx.episode.get() {
            form.episode_number = ep.ep_number.clone();
        }
        form
    }

    pub fn state(&self) -> SubmissionState<ArchiveResult> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    /// Vault terminal lines of the current or last run.
    pub fn log(&self) -> Vec<String> {
        self.log.entries()
    }

    /// Episode `0` passes validation; the vault itself rejects it.
    pub async fn submit(&self, input: &ArchiveForm) -> Result<ArchiveResult, AppError> {
        let payload = self.form.check(|errors| {
            let ep = require_episode_digits(errors, "episode_number", &input.episode_number, "Episode number is required.");
            let theme = input.theme.trim();
            if !VAULT_THEMES.contains(&theme) {
                errors.insert("theme", "Select a vault theme.");
            }
            Some(ArchivePayload {
                episode_number: ep?,
                theme: theme.to_string(),
                tags: split_list(&input.tags),
            })
        })?;

        self.form
            .run(async {
                self.log.clear();
                let (tx, rx) = mpsc::channel(8);
                let (result, _) = tokio::join!(
                    self.ctx.services.vault.archive(&payload, tx),
                    self.log.drain(rx)
                );
                result
            })
            .await
    }
}
