use super::ModuleKind;
use crate::config::UiConfig;
use crate::forms::{read_lock, write_lock};
use crate::timer::ScopedTask;
use serde::Serialize;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "module", rename_all = "snake_case")]
pub enum ModalPhase {
    Closed,
    Opening(ModuleKind),
    Open(ModuleKind),
    Closing(ModuleKind),
}

/// Modal hosting one panel, with timed open and close transitions.
pub struct ModuleModal {
    phase: Arc<RwLock<ModalPhase>>,
    transition: Mutex<Option<ScopedTask>>,
    open_delay: Duration,
    close_delay: Duration,
}

impl ModuleModal {
    pub fn new(open_delay: Duration, close_delay: Duration) -> Self {
        Self {
            phase: Arc::new(RwLock::new(ModalPhase::Closed)),
            transition: Mutex::new(None),
            open_delay,
            close_delay,
        }
    }

    pub fn from_config(ui: &UiConfig) -> Self {
        Self::new(
            Duration::from_millis(ui.modal_open_ms),
            Duration::from_millis(ui.modal_close_ms),
        )
    }

    pub fn phase(&self) -> ModalPhase {
        *read_lock(&self.phase)
    }

    /// The module being shown, including while it animates in or out.
    pub fn active_module(&self) -> Option<ModuleKind> {
        match self.phase() {
            ModalPhase::Closed => None,
            ModalPhase::Opening(kind) | ModalPhase::Open(kind) | ModalPhase::Closing(kind) => Some(kind),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase(), ModalPhase::Open(_))
    }

    /// Must be called inside a Tokio runtime.
    pub fn open(&self, kind: ModuleKind) {
        log::info!("Opening module {}", kind);
        *write_lock(&self.phase) = ModalPhase::Opening(kind);
        self.schedule(self.open_delay, ModalPhase::Opening(kind), ModalPhase::Open(kind));
    }

    pub fn close(&self) {
        let Some(kind) = self.active_module() else {
            return;
        };
        *write_lock(&self.phase) = ModalPhase::Closing(kind);
        self.schedule(self.close_delay, ModalPhase::Closing(kind), ModalPhase::Closed);
    }

    /// Move `from` to `to` after `delay`, replacing any pending transition.
    fn schedule(&self, delay: Duration, from: ModalPhase, to: ModalPhase) {
        let phase = self.phase.clone();
        let task = ScopedTask::delay(delay, move || {
            let mut current = write_lock(&phase);
            if *current == from {
                *current = to;
            }
        });
        let previous = self
            .transition
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(task);
        drop(previous);
    }
}
