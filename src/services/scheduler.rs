use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// A background job that runs `tick` every `period` until cancelled or dropped.
///
/// The first run happens one full period after spawning. A slow tick delays
/// the next one instead of letting two runs of the same task overlap.
#[derive(Debug)]
pub struct RepeatingTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl RepeatingTask {
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tracing::debug!("Starting task {} every {:?}", name, period);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() completes its first tick immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                tick().await;
            }
        });

        Self { name, handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            tracing::debug!("Stopping task {}", self.name);
            self.handle.abort();
        }
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            tracing::debug!("Dropping task {}", self.name);
            self.handle.abort();
        }
    }
}
