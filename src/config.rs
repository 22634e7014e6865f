//! Console configuration.
//!
//! Loaded from `config.yaml` in the platform config directory. Every section
//! has defaults matching the reference timings, so a missing file or a
//! partial file is valid.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "episode-console";
const CONFIG_FILE: &str = "config.yaml";
const CONFIG_ENV: &str = "EPISODE_CONSOLE_CONFIG";
const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Seed for the simulated services. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    pub latency: LatencyConfig,
    pub failure: FailureConfig,
    pub qr: QrConfig,
    pub ollama: OllamaConfig,
    pub timeline: TimelineConfig,
    pub ui: UiConfig,
    /// Where this config came from; not read from the file itself.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub upload_ms: u64,
    pub sponsor_list_ms: u64,
    pub sponsor_link_ms: u64,
    pub channel_min_ms: u64,
    pub channel_max_ms: u64,
    pub vault_connect_ms: u64,
    pub vault_encrypt_ms: u64,
    pub vault_hash_ms: u64,
    pub subtitle_analysis_ms: u64,
    pub description_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            upload_ms: 3000,
            sponsor_list_ms: 800,
            sponsor_link_ms: 1500,
            channel_min_ms: 1000,
            channel_max_ms: 2500,
            vault_connect_ms: 700,
            vault_encrypt_ms: 900,
            vault_hash_ms: 500,
            subtitle_analysis_ms: 2500,
            description_ms: 0,
        }
    }
}

impl LatencyConfig {
    pub fn zero() -> Self {
        Self {
            upload_ms: 0,
            sponsor_list_ms: 0,
            sponsor_link_ms: 0,
            channel_min_ms: 0,
            channel_max_ms: 0,
            vault_connect_ms: 0,
            vault_encrypt_ms: 0,
            vault_hash_ms: 0,
            subtitle_analysis_ms: 0,
            description_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureConfig {
    /// Probability in `[0, 1]` that an Email dispatch times out.
    pub email_failure_rate: f64,
}

impl Default for FailureConfig {
    fn default() -> Self {
        Self {
            email_failure_rate: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    pub endpoint: String,
    pub size: u32,
    /// Build the image URL without contacting the endpoint.
    pub offline: bool,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.qrserver.com/v1/create-qr-code/".to_string(),
            size: 128,
            offline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Wall-clock interval between ticks.
    pub tick_ms: u64,
    /// Playback time added per tick.
    pub step_ms: u64,
    pub duration_seconds: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            step_ms: 100,
            duration_seconds: 20,
        }
    }
}

impl TimelineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub modal_open_ms: u64,
    pub modal_close_ms: u64,
    pub chart_notice_ms: u64,
    pub error_log_capacity: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            modal_open_ms: 50,
            modal_close_ms: 200,
            chart_notice_ms: 3000,
            error_log_capacity: 100,
        }
    }
}

impl ConsoleConfig {
    /// Zero-latency, offline, fixed-seed profile for tests and dry runs.
    pub fn instant() -> Self {
        Self {
            rng_seed: Some(7),
            latency: LatencyConfig::zero(),
            qr: QrConfig {
                offline: true,
                ..QrConfig::default()
            },
            ..Self::default()
        }
    }

    /// Default config path: `$EPISODE_CONSOLE_CONFIG`, else
    /// `<config_dir>/episode-console/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default path, falling back to defaults when absent.
    pub fn load_default() -> Result<Self, AppError> {
        Self::load(None)
    }

    /// Load from `path` when given, else from the default path. Environment
    /// overrides apply either way.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from(&path)?,
            None => {
                log::warn!("No config directory available, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path`. A missing file yields defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::info!("Config not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        let mut config = Self::parse(&content)?;
        config.source = Some(path.to_path_buf());
        log::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, AppError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        let rate = self.failure.email_failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(AppError::Config(format!(
                "failure.email_failure_rate must be within [0, 1], got {}",
                rate
            )));
        }
        if self.latency.channel_min_ms > self.latency.channel_max_ms {
            return Err(AppError::Config(
                "latency.channel_min_ms must not exceed latency.channel_max_ms".to_string(),
            ));
        }
        if self.timeline.step_ms == 0 || self.timeline.duration_seconds == 0 {
            return Err(AppError::Config(
                "timeline.step_ms and timeline.duration_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var(OLLAMA_HOST_ENV) {
            let host = host.trim();
            if !host.is_empty() {
                let base = if host.starts_with("http") {
                    host.to_string()
                } else {
                    format!("http://{}", host)
                };
                log::info!("Ollama base URL overridden from {}", OLLAMA_HOST_ENV);
                self.ollama.base_url = base;
            }
        }
    }

    pub fn source_label(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "defaults".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConsoleConfig::load_from(&temp.path().join("config.yaml")).unwrap();
        assert_eq!(config.latency.upload_ms, 3000);
        assert_eq!(config.timeline.tick_ms, 100);
        assert!(config.source.is_none());
        assert_eq!(config.source_label(), "defaults");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            "rng_seed: 42\nlatency:\n  upload_ms: 10\nqr:\n  offline: true\n",
        )
        .unwrap();

        let config = ConsoleConfig::load_from(&path).unwrap();
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.latency.upload_ms, 10);
        assert_eq!(config.latency.sponsor_link_ms, 1500);
        assert!(config.qr.offline);
        assert_eq!(config.qr.size, 128);
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn explicit_path_wins_over_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("console.yaml");
        std::fs::write(&path, "rng_seed: 9\n").unwrap();

        let config = ConsoleConfig::load(Some(&path)).unwrap();
        assert_eq!(config.rng_seed, Some(9));
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn malformed_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "latency: [not, a, map").unwrap();

        let err = ConsoleConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn rejects_out_of_range_failure_rate() {
        let err = ConsoleConfig::parse("failure:\n  email_failure_rate: 1.5\n").unwrap_err();
        assert!(err.to_string().contains("email_failure_rate"));
    }

    #[test]
    fn rejects_inverted_channel_latency() {
        let yaml = "latency:\n  channel_min_ms: 900\n  channel_max_ms: 100\n";
        assert!(ConsoleConfig::parse(yaml).is_err());
    }

    #[test]
    fn instant_profile_is_offline_and_seeded() {
        let config = ConsoleConfig::instant();
        assert_eq!(config.latency.upload_ms, 0);
        assert!(config.qr.offline);
        assert!(!config.ollama.enabled);
        assert!(config.rng_seed.is_some());
    }
}
