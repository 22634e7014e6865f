//! Form state shared by every dashboard panel.
//!
//! A panel validates its input into a [`FieldErrors`] map, then runs the
//! service call through a [`FormState`], whose [`SubmissionState`] is always
//! exactly one of idle, pending, success or failed.

use crate::diagnostics::ErrorLog;
use crate::error::AppError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

// ============================================================================
// Field errors
// ============================================================================

/// Field-keyed validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Drop the error for `field`, e.g. after the user edits it.
    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// Validators
// ============================================================================

/// Non-empty after trim. Returns the trimmed value when valid.
pub fn require_text(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, message);
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Strictly positive integer.
pub fn require_positive_int(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            errors.insert(field, message);
            None
        }
    }
}

/// Non-negative integer. Used where the service itself owns the sentinel
/// check on episode `0`.
pub fn require_episode_digits(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        Some(trimmed.to_string())
    } else {
        errors.insert(field, message);
        None
    }
}

pub fn require_present<'a, T>(errors: &mut FieldErrors, field: &str, value: Option<&'a T>, message: &str) -> Option<&'a T> {
    if value.is_none() {
        errors.insert(field, message);
    }
    value
}

/// Split comma separated input, trimming entries and dropping blanks.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Submission state
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum SubmissionState<T> {
    Idle,
    Pending,
    Success(T),
    Failed(String),
}

impl<T> Default for SubmissionState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> SubmissionState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Claim on a pending submission. Settling writes the outcome; dropping it
/// unsettled (cancelled future, panic) marks the submission failed so the
/// panel never stays pending.
pub struct PendingSubmission<T> {
    state: Arc<RwLock<SubmissionState<T>>>,
    settled: bool,
}

impl<T: Clone> PendingSubmission<T> {
    pub fn settle(mut self, outcome: &Result<T, AppError>) {
        let next = match outcome {
            Ok(value) => SubmissionState::Success(value.clone()),
            Err(e) => SubmissionState::Failed(e.to_string()),
        };
        *write_lock(&self.state) = next;
        self.settled = true;
    }
}

impl<T> Drop for PendingSubmission<T> {
    fn drop(&mut self) {
        if !self.settled {
            *write_lock(&self.state) =
                SubmissionState::Failed("Operation was interrupted before it completed.".to_string());
        }
    }
}

/// Validation errors plus submission state for one panel.
pub struct FormState<T> {
    module: &'static str,
    state: Arc<RwLock<SubmissionState<T>>>,
    errors: Arc<RwLock<FieldErrors>>,
    error_log: Arc<ErrorLog>,
}

impl<T: Clone> FormState<T> {
    pub fn new(module: &'static str, error_log: Arc<ErrorLog>) -> Self {
        Self {
            module,
            state: Arc::new(RwLock::new(SubmissionState::Idle)),
            errors: Arc::new(RwLock::new(FieldErrors::default())),
            error_log,
        }
    }

    pub fn state(&self) -> SubmissionState<T> {
        read_lock(&self.state).clone()
    }

    pub fn field_errors(&self) -> FieldErrors {
        read_lock(&self.errors).clone()
    }

    pub fn clear_field_error(&self, field: &str) {
        write_lock(&self.errors).clear(field);
    }

    /// Back to idle, e.g. when an input changes after a result was shown.
    /// A pending submission is left alone.
    pub fn reset(&self) {
        let mut state = write_lock(&self.state);
        if !state.is_pending() {
            *state = SubmissionState::Idle;
        }
    }

    /// Run `build` against a fresh error map. The map replaces the panel's
    /// previous errors; any entry blocks the submission.
    pub fn check<R>(&self, build: impl FnOnce(&mut FieldErrors) -> Option<R>) -> Result<R, AppError> {
        let mut errors = FieldErrors::default();
        let request = build(&mut errors);
        *write_lock(&self.errors) = errors.clone();

        match request {
            Some(request) if errors.is_empty() => Ok(request),
            _ => {
                log::info!("[{}] submission blocked: {}", self.module, errors);
                Err(AppError::Validation(errors))
            }
        }
    }

    /// Enter the pending state, or fail with `Busy` if already pending.
    pub fn begin(&self) -> Result<PendingSubmission<T>, AppError> {
        let mut state = write_lock(&self.state);
        if state.is_pending() {
            return Err(AppError::Busy(self.module.to_string()));
        }
        *state = SubmissionState::Pending;
        Ok(PendingSubmission {
            state: self.state.clone(),
            settled: false,
        })
    }

    /// Await `operation` inside a pending window and record its outcome.
    pub async fn run<Fut>(&self, operation: Fut) -> Result<T, AppError>
    where
        Fut: Future<Output = Result<T, AppError>>,
    {
        let pending = self.begin()?;
        let outcome = operation.await;
        if let Err(e) = &outcome {
            self.error_log.log_error(self.module, &e.to_string(), None);
        }
        pending.settle(&outcome);
        outcome
    }

    /// Record an outcome computed without awaiting anything.
    pub fn complete(&self, outcome: Result<T, AppError>) -> Result<T, AppError> {
        let pending = self.begin()?;
        if let Err(e) = &outcome {
            self.error_log.log_error(self.module, &e.to_string(), None);
        }
        pending.settle(&outcome);
        outcome
    }
}

/// Ordered progress entries streamed by a multi-step operation.
pub struct ProgressLog<E> {
    entries: Arc<RwLock<Vec<E>>>,
}

impl<E: Clone> ProgressLog<E> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn entries(&self) -> Vec<E> {
        read_lock(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        read_lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        write_lock(&self.entries).clear();
    }

    pub fn push(&self, entry: E) {
        write_lock(&self.entries).push(entry);
    }

    /// Append everything received on `rx` until the sender side closes.
    pub async fn drain(&self, mut rx: tokio::sync::mpsc::Receiver<E>) {
        while let Some(entry) = rx.recv().await {
            self.push(entry);
        }
    }
}

impl<E: Clone> Default for ProgressLog<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormState<u32> {
        FormState::new("test_module", Arc::new(ErrorLog::new(10)))
    }

    #[test]
    fn positive_int_rejects_zero_and_garbage() {
        let mut errors = FieldErrors::default();
        assert_eq!(require_positive_int(&mut errors, "ep", "12", "bad"), Some(12));
        assert!(errors.is_empty());
        assert_eq!(require_positive_int(&mut errors, "ep", "0", "bad"), None);
        assert_eq!(require_positive_int(&mut errors, "ep2", "-3", "bad"), None);
        assert_eq!(require_positive_int(&mut errors, "ep3", "4x", "bad"), None);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn episode_digits_allow_zero() {
        let mut errors = FieldErrors::default();
        assert_eq!(require_episode_digits(&mut errors, "ep", " 0 ", "bad").as_deref(), Some("0"));
        assert!(require_episode_digits(&mut errors, "ep", "", "bad").is_none());
        assert!(errors.contains("ep"));
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list(" a, b ,, c ,"), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn check_blocks_on_any_error() {
        let form = form();
        let result = form.check(|errors| {
            let title = require_text(errors, "title", "  ", "Title is required.");
            let ep = require_positive_int(errors, "ep_number", "3", "bad");
            Some((title, ep))
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(form.field_errors().get("title"), Some("Title is required."));

        form.clear_field_error("title");
        assert!(form.field_errors().is_empty());
        assert_eq!(form.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn run_settles_exactly_one_outcome() {
        let form = form();
        let value = form.run(async { Ok(5) }).await.unwrap();
        assert_eq!(value, 5);
        assert_eq!(form.state(), SubmissionState::Success(5));

        let err = form.run(async { Err(AppError::Service("boom".into())) }).await;
        assert!(err.is_err());
        assert_eq!(form.state(), SubmissionState::Failed("boom".to_string()));
        assert_eq!(form.error_log.get_errors().len(), 1);
    }

    #[test]
    fn second_begin_is_busy() {
        let form = form();
        let pending = form.begin().unwrap();
        assert!(form.state().is_pending());
        assert!(matches!(form.begin(), Err(AppError::Busy(_))));

        // reset leaves a pending submission untouched
        form.reset();
        assert!(form.state().is_pending());

        pending.settle(&Ok(1));
        assert_eq!(form.state(), SubmissionState::Success(1));
        form.reset();
        assert_eq!(form.state(), SubmissionState::Idle);
    }

    #[test]
    fn dropped_claim_marks_failed() {
        let form = form();
        drop(form.begin().unwrap());
        assert!(form.state().failure().is_some());
    }

    #[tokio::test]
    async fn progress_log_drains_in_order() {
        let log = ProgressLog::new();
        let (tx, rx) = tokio::sync::mpsc::channel(4);
        let producer = async move {
            for step in ["one", "two", "three"] {
                tx.send(step.to_string()).await.unwrap();
            }
        };
        tokio::join!(producer, log.drain(rx));
        assert_eq!(log.entries(), vec!["one", "two", "three"]);
    }
}
