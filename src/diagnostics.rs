use crate::store::models::{ActiveEpisode, Sponsor};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Recent panel failures, newest last, bounded to `max_entries`.
pub struct ErrorLog {
    errors: Mutex<VecDeque<ErrorEntry>>,
    max_entries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEntry {
    pub timestamp: String,
    pub module: String,
    pub error: String,
    pub context: Option<String>,
}

impl ErrorLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            errors: Mutex::new(VecDeque::new()),
            max_entries: max_entries.max(1),
        }
    }

    pub fn log_error(&self, module: &str, error: &str, context: Option<&str>) {
        let entry = ErrorEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            module: module.to_string(),
            error: error.to_string(),
            context: context.map(|s| s.to_string()),
        };

        log::error!("[{}] {}: {}", entry.timestamp, module, error);

        let mut errors = self.errors.lock().unwrap_or_else(|e| e.into_inner());
        if errors.len() >= self.max_entries {
            errors.pop_front();
        }
        errors.push_back(entry);
    }

    pub fn get_errors(&self) -> Vec<ErrorEntry> {
        self.errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsReport {
    pub app_version: String,
    pub config_source: String,
    pub active_episode: Option<ActiveEpisode>,
    pub open_module: Option<String>,
    pub sponsors: Vec<Sponsor>,
    pub playlist_count: usize,
    pub recent_errors: Vec<ErrorEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_newest_entries() {
        let log = ErrorLog::new(2);
        log.log_error("upload_manager", "first", None);
        log.log_error("archive_to_vault", "second", Some("ep 0"));
        log.log_error("sponsor_grid_sync", "third", None);

        let errors = log.get_errors();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].error, "second");
        assert_eq!(errors[0].context.as_deref(), Some("ep 0"));
        assert_eq!(errors[1].module, "sponsor_grid_sync");

        log.clear();
        assert!(log.get_errors().is_empty());
    }
}
