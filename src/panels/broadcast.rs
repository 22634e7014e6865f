use super::{ModuleKind, PanelContext, EPISODE_NUMBER_INVALID};
use crate::error::AppError;
use crate::forms::{require_positive_int, require_text, FieldErrors, FormState, ProgressLog, SubmissionState};
use crate::services::{BroadcastPayload, BroadcastResult, BroadcastStatus, Channel};
use serde::Serialize;
use std::collections::BTreeSet;
use tokio::sync::mpsc;

/// Message template for `episode_number`.
pub fn default_message(episode_number: &str) -> String {
    format!(
        "Greetings Diaspora Node,\n\n\
         GN AI Authority has released Episode {}. This broadcast covers critical updates on our reform initiatives.\n\n\
         Engage with the material, share within your network, and utilize the QR code for direct access to the civic action form.\n\n\
         Your participation is integral.\n\n\
         #GNLegacy #DiasporaJustice",
        episode_number
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastForm {
    episode_number: String,
    pub channels: BTreeSet<Channel>,
    pub message: String,
}

impl Default for BroadcastForm {
    fn default() -> Self {
        Self::for_episode("42")
    }
}

impl BroadcastForm {
    pub fn for_episode(episode_number: &str) -> Self {
        Self {
            episode_number: episode_number.to_string(),
            channels: [Channel::WhatsApp, Channel::Email].into_iter().collect(),
            message: default_message(episode_number),
        }
    }

    pub fn episode_number(&self) -> &str {
        &self.episode_number
    }

    /// Changing the episode regenerates the message from the template.
    pub fn set_episode_number(&mut self, episode_number: &str) {
        self.episode_number = episode_number.to_string();
        self.message = default_message(episode_number);
    }

    pub fn toggle(&mut self, channel: Channel, enabled: bool) {
        if enabled {
            self.channels.insert(channel);
        } else {
            self.channels.remove(&channel);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BroadcastSummary {
    pub delivered: usize,
    pub failed: usize,
}

pub struct BroadcastPanel {
    ctx: PanelContext,
    form: FormState<BroadcastSummary>,
    log: ProgressLog<BroadcastResult>,
}

impl BroadcastPanel {
    pub fn new(ctx: PanelContext) -> Self {
        let form = FormState::new(ModuleKind::DiasporaBroadcast.id(), ctx.error_log.clone());
        Self {
            ctx,
            form,
            log: ProgressLog::new(),
        }
    }

    pub fn default_form(&self) -> BroadcastForm {
        match self.ctx.episode.get() {
            Some(ep) => BroadcastForm::for_episode(&ep.ep_number),
            None => BroadcastForm::default(),
        }
    }

    pub fn state(&self) -> SubmissionState<BroadcastSummary> {
        self.form.state()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.field_errors()
    }

    /// Per-channel outcomes of the current or last broadcast, in dispatch order.
    pub fn log(&self) -> Vec<BroadcastResult> {
        self.log.entries()
    }

    pub fn status_line(&self) -> Option<&'static str> {
        match self.form.state() {
            SubmissionState::Pending => Some(">> BROADCAST IN PROGRESS..."),
            _ if !self.log.is_empty() => Some(">> BROADCAST COMPLETE."),
            _ => None,
        }
    }

    /// Dispatch to each selected channel in turn. Individual channel
    /// failures are reported in the log; the broadcast itself succeeds.
    pub async fn submit(&self, input: &BroadcastForm) -> Result<BroadcastSummary, AppError> {
        let payload = self.form.check(|errors| {
            let ep = require_positive_int(errors, "episode_number", &input.episode_number, EPISODE_NUMBER_INVALID);
            let message = require_text(errors, "message", &input.message, "Message is required.");
            if input.channels.is_empty() {
                errors.insert("channels", "Select at least one channel.");
            }
            Some(BroadcastPayload {
                episode_number: ep?.to_string(),
                message: message?,
                channels: input.channels.iter().copied().collect(),
            })
        })?;

        self.form
            .run(async {
                self.log.clear();
                let (tx, rx) = mpsc::channel(payload.channels.len().max(1));
                tokio::join!(
                    self.ctx.services.outreach.broadcast(&payload, tx),
                    self.log.drain(rx)
                );

                let results = self.log.entries();
                let failed = results
                    .iter()
                    .filter(|r| r.status == BroadcastStatus::Failed)
                    .count();
                Ok::<_, AppError>(BroadcastSummary {
                    delivered: results.len() - failed,
                    failed,
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::panels::{test_support, PanelContext};

    #[test]
    fn episode_change_regenerates_message() {
        let mut form = BroadcastForm::default();
        assert!(form.message.contains("Episode 42."));
        form.message = "custom".into();
        form.set_episode_number("57");
        assert!(form.message.contains("Episode 57."));
        assert_eq!(form.episode_number(), "57");
        assert_eq!(form.channels.len(), 2);
        assert!(!form.channels.contains(&Channel::FlushingNode));
    }

    #[tokio::test]
    async fn no_channels_is_a_field_error() {
        let panel = BroadcastPanel::new(test_support::context());
        let mut form = BroadcastForm::default();
        form.toggle(Channel::WhatsApp, false);
        form.toggle(Channel::Email, false);

        let err = panel.submit(&form).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains("channels"));
        assert!(panel.log().is_empty());
        assert!(panel.status_line().is_none());
    }

    #[tokio::test]
    async fn email_failure_is_reported_without_aborting() {
        let mut config = ConsoleConfig::instant();
        config.failure.email_failure_rate = 1.0;
        let panel = BroadcastPanel::new(PanelContext::new(config));

        let mut form = BroadcastForm::default();
        form.toggle(Channel::FlushingNode, true);
        let summary = panel.submit(&form).await.unwrap();

        assert_eq!(summary, BroadcastSummary { delivered: 2, failed: 1 });
        let log = panel.log();
        let channels: Vec<Channel> = log.iter().map(|r| r.channel).collect();
        assert_eq!(channels, vec![Channel::WhatsApp, Channel::Email, Channel::FlushingNode]);
        assert_eq!(log[1].message, "SMTP server connection timed out.");
        assert_eq!(panel.status_line(), Some(">> BROADCAST COMPLETE."));
    }

    #[tokio::test]
    async fn rerun_replaces_the_log() {
        let mut config = ConsoleConfig::instant();
        config.failure.email_failure_rate = 0.0;
        let panel = BroadcastPanel::new(PanelContext::new(config));
        let form = BroadcastForm::default();

        panel.submit(&form).await.unwrap();
        panel.submit(&form).await.unwrap();
        assert_eq!(panel.log().len(), 2);
    }
}
