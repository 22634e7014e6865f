use super::{Latency, SimRng};
use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

const INVALID_EPISODE: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchivePayload {
    pub episode_number: String,
    pub theme: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveResult {
    pub confirmation_id: String,
    pub vault_path: String,
    pub timestamp: String,
}

pub struct VaultService {
    /// Connect, encrypt, hash.
    stages: [Latency; 3],
    rng: SimRng,
}

/// Lowercase and collapse whitespace runs into `-`.
pub fn theme_slug(theme: &str) -> String {
    super::dash_whitespace(&theme.to_lowercase())
}

pub fn vault_path(theme: &str, episode_number: &str, at: DateTime<Utc>) -> String {
    format!(
        "/vault/{}/{}/GN-Ep{}.zip.aes",
        theme_slug(theme),
        at.format("%Y-%m-%d"),
        episode_number
    )
}

impl VaultService {
    pub fn new(stages: [Latency; 3], rng: SimRng) -> Self {
        Self { stages, rng }
    }

    async fn log(progress: &mpsc::Sender<String>, line: &str) {
        log::info!("{}", line);
        let _ = progress.send(line.to_string()).await;
    }

    /// Staged archival. Every stage is reported on `progress` before the
    /// result resolves; a rejection reports an `ARCHIVAL FAILED` line.
    #[tracing::instrument(skip_all, fields(ep = %payload.episode_number, theme = %payload.theme))]
    pub async fn archive(&self, payload: &ArchivePayload, progress: mpsc::Sender<String>) -> Result<ArchiveResult, AppError> {
        match self.run_stages(payload, &progress).await {
            Ok(result) => Ok(result),
            Err(e) => {
                Self::log(&progress, &format!(">> ARCHIVAL FAILED: {}", e)).await;
                Err(e)
            }
        }
    }

    async fn run_stages(&self, payload: &ArchivePayload, progress: &mpsc::Sender<String>) -> Result<ArchiveResult, AppError> {
        let [connect, encrypt, hash] = self.stages;

        Self::log(progress, ">> INITIATING VAULT CONNECTION...").await;
        connect.wait(&self.rng).await;

        if payload.episode_number.trim() == INVALID_EPISODE {
            return Err(AppError::Service(
                "Invalid Episode Number. Archival rejected by Vault protocol.".to_string(),
            ));
        }

        Self::log(progress, ">> ENCRYPTING ASSET BUNDLE (AES-256)...").await;
        encrypt.wait(&self.rng).await;

        Self::log(progress, ">> GENERATING SECURE TIMESTAMP & HASH...").await;
        hash.wait(&self.rng).await;

        let now = Utc::now();
        let result = ArchiveResult {
            confirmation_id: format!("VAULT-CONF-{}-{}", now.timestamp_millis(), self.rng.token(7)),
            vault_path: vault_path(&payload.theme, payload.episode_number.trim(), now),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        Self::log(progress, ">> COMMIT COMPLETE. ARCHIVAL SECURED.").await;
        Ok(result)
    }
}
