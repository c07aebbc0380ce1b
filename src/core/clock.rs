use crate::domain::ports::GameView;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Elapsed-time tracking for one round. All durations derive from the
/// single start instant, so tick jitter can never accumulate into drift.
#[derive(Debug, Clone, Copy)]
pub struct RoundClock {
    started_at: Instant,
}

impl RoundClock {
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Whole seconds for score submission, rounded to the nearest second.
pub fn elapsed_seconds(elapsed: Duration) -> u64 {
    (elapsed.as_millis() as u64 + 500) / 1000
}

/// `MM:SS` display form.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_seconds = elapsed.as_secs();
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Pushes one `tick` per second into the view while a round is running.
/// Dropping the ticker (or starting a new round, which replaces it) stops
/// the stream.
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn(clock: RoundClock, view: Arc<dyn GameView>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                interval.tick().await;
                view.tick(clock.elapsed());
            }
        });
        Self { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
