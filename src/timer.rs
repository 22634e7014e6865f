//! Scoped timer tasks.
//!
//! A [`ScopedTask`] owns a spawned Tokio task and cancels it when dropped,
//! so a recurring tick or a delayed callback never outlives the component
//! that started it.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct ScopedTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ScopedTask {
    /// Spawn `body` with a token that is cancelled when the task is dropped.
    pub fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(body(cancel.clone()));
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Run `action` once after `delay`, unless cancelled first.
    pub fn delay<A>(delay: Duration, action: A) -> Self
    where
        A: FnOnce() + Send + 'static,
    {
        Self::spawn(move |cancel| async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => action(),
            }
        })
    }

    /// Run `action` every `period`, first firing one period from now.
    pub fn repeat<A>(period: Duration, mut action: A) -> Self
    where
        A: FnMut() + Send + 'static,
    {
        Self::spawn(move |cancel| async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => action(),
                }
            }
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    pub fn cancel(self) {
        drop(self)
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
