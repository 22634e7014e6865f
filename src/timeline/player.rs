use super::TimelineClock;
use crate::config::TimelineConfig;
use crate::forms::{read_lock, write_lock};
use crate::timer::ScopedTask;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

/// Drives a [`TimelineClock`] from a repeating timer.
///
/// The tick task is a [`ScopedTask`], so stopping, restarting or dropping
/// the player always cancels the previous timer.
pub struct TimelinePlayer {
    clock: Arc<RwLock<TimelineClock>>,
    interval: Duration,
    task: Mutex<Option<ScopedTask>>,
}

impl TimelinePlayer {
    pub fn new(clock: TimelineClock, interval: Duration) -> Self {
        Self {
            clock: Arc::new(RwLock::new(clock)),
            interval,
            task: Mutex::new(None),
        }
    }

    pub fn from_config(config: &TimelineConfig) -> Self {
        Self::new(TimelineClock::from_config(config), config.tick_interval())
    }

    /// Reset to zero and start ticking. A running timer is replaced.
    pub fn start(&self) {
        write_lock(&self.clock).reset();

        let clock = self.clock.clone();
        let task = ScopedTask::repeat(self.interval, move || {
            if write_lock(&clock).tick() {
                log::debug!("Timeline looped back to 0");
            }
        });

        let previous = self.task_slot().replace(task);
        drop(previous);
        log::info!("Timeline started, tick every {:?}", self.interval);
    }

    pub fn stop(&self) {
        if self.task_slot().take().is_some() {
            log::info!("Timeline stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task_slot().as_ref().map_or(false, |t| !t.is_finished())
    }

    pub fn snapshot(&self) -> TimelineClock {
        read_lock(&self.clock).clone()
    }

    pub fn current_time(&self) -> f64 {
        read_lock(&self.clock).current_time()
    }

    fn task_slot(&self) -> std::sync::MutexGuard<'_, Option<ScopedTask>> {
        self.task.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> TimelinePlayer {
        TimelinePlayer::new(TimelineClock::new(100, 20), Duration::from_millis(100))
    }

    #[tokio::test(start_paused = true)]
    async fn advances_one_step_per_interval() {
        let player = player();
        player.start();
        assert!(player.is_running());

        tokio::time::sleep(Duration::from_millis(1050)).await;
        assert!((player.current_time() - 1.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_position() {
        let player = player();
        player.start();
        tokio::time::sleep(Duration::from_millis(550)).await;
        player.stop();
        assert!(!player.is_running());

        let frozen = player.current_time();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(player.current_time(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resets_and_keeps_single_timer() {
        let player = player();
        player.start();
        tokio::time::sleep(Duration::from_millis(750)).await;

        player.start();
        assert_eq!(player.current_time(), 0.0);
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!((player.current_time() - 0.3).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn loops_over_the_duration() {
        let player = TimelinePlayer::new(TimelineClock::new(100, 1), Duration::from_millis(100));
        player.start();
        tokio::time::sleep(Duration::from_millis(1250)).await;

        let clock = player.snapshot();
        assert_eq!(clock.loops(), 1);
        assert!((clock.current_time() - 0.2).abs() < 1e-9);
    }
}
