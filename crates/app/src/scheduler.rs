//! Minute-tick schedule runner.
//!
//! A background task wakes at the start of every local minute and asks its
//! [`ScheduleExecutor`] to fire the entries matching that minute. Each
//! distinct minute is evaluated at most once, so a wake-up that lands twice
//! in the same minute is harmless.

use std::sync::Arc;
use std::time::Duration;

use lighthub_domain::time::{LocalTime, MinuteKey, seconds_until_next_minute};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ports::Clock;

/// Fires the schedule entries due at a given local time.
pub trait ScheduleExecutor: Send + Sync {
    /// Returns how many entries fired.
    fn run_schedules_at(&self, now: &LocalTime) -> usize;
}

impl<T: ScheduleExecutor> ScheduleExecutor for Arc<T> {
    fn run_schedules_at(&self, now: &LocalTime) -> usize {
        (**self).run_schedules_at(now)
    }
}

pub struct ScheduleRunner<E, K> {
    executor: E,
    clock: K,
    last_minute: Option<MinuteKey>,
}

impl<E, K> ScheduleRunner<E, K>
where
    E: ScheduleExecutor + 'static,
    K: Clock + 'static,
{
    pub fn new(executor: E, clock: K) -> Self {
        Self {
            executor,
            clock,
            last_minute: None,
        }
    }

    /// Evaluate the current minute unless it was already evaluated.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let key = MinuteKey::of(&now);
        if self.last_minute == Some(key) {
            return 0;
        }
        self.last_minute = Some(key);
        let fired = self.executor.run_schedules_at(&now);
        debug!(%now, fired, "schedule tick");
        fired
    }

    /// Run the loop on the current tokio runtime until the handle is stopped.
    #[must_use]
    pub fn spawn(self) -> ScheduleHandle {
        let (shutdown, receiver) = watch::channel(false);
        let task = tokio::spawn(self.run(receiver));
        ScheduleHandle { shutdown, task }
    }

    async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("schedule runner started");
        loop {
            self.tick();
            let wait = seconds_until_next_minute(&self.clock.now());
            tokio::select! {
                () = tokio::time::sleep(Duration::from_secs(wait)) => {}
                _ = shutdown.changed() => break,
            }
        }
        info!("schedule runner stopped");
    }
}

/// Handle to a spawned [`ScheduleRunner`].
pub struct ScheduleHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ScheduleHandle {
    /// Signal the loop and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            warn!(error = %err, "schedule runner ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedClock;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingExecutor {
        calls: Mutex<Vec<LocalTime>>,
    }

    impl ScheduleExecutor for CountingExecutor {
        fn run_schedules_at(&self, now: &LocalTime) -> usize {
            self.calls.lock().unwrap().push(*now);
            1
        }
    }

    impl CountingExecutor {
        fn count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    fn at(hour: u32, minute: u32, second: u32) -> LocalTime {
        NaiveDate::from_ymd_opt(2026, 10, 12)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn should_evaluate_each_minute_once() {
        let executor = Arc::new(CountingExecutor::default());
        let clock = Arc::new(FixedClock::at(at(7, 0, 1)));
        let mut runner = ScheduleRunner::new(executor.clone(), clock.clone());

        assert_eq!(runner.tick(), 1);
        clock.set(at(7, 0, 59));
        assert_eq!(runner.tick(), 0);
        clock.set(at(7, 1, 0));
        assert_eq!(runner.tick(), 1);

        assert_eq!(executor.count(), 2);
    }

    #[test]
    fn should_evaluate_again_when_clock_moves_back_to_other_minute() {
        let executor = Arc::new(CountingExecutor::default());
        let clock = Arc::new(FixedClock::at(at(7, 5, 0)));
        let mut runner = ScheduleRunner::new(executor.clone(), clock.clone());

        runner.tick();
        clock.set(at(7, 4, 30));
        runner.tick();

        assert_eq!(executor.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn should_tick_on_start_and_stop_when_asked() {
        let executor = Arc::new(CountingExecutor::default());
        let clock = Arc::new(FixedClock::at(at(7, 0, 58)));
        let handle = ScheduleRunner::new(executor.clone(), clock.clone()).spawn();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(executor.count(), 1);

        clock.set(at(7, 1, 0));
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(executor.count(), 2);

        handle.stop().await;
        clock.set(at(7, 2, 0));
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(executor.count(), 2);
    }
}
