use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::session::SessionController;

/// Default revalidation period: one hour
pub const DEFAULT_REVALIDATE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Background task that revalidates the session on a fixed period.
///
/// The task is aborted when the timer is stopped or dropped.
pub struct RevalidationTimer {
    handle: JoinHandle<()>,
}

impl RevalidationTimer {
    /// Start ticking; the first tick fires one full `period` from now.
    pub fn spawn(controller: Arc<SessionController>, period: Duration) -> Self {
        info!(period_secs = period.as_secs(), "Starting revalidation timer");

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if !controller.store().is_authenticated() {
                    debug!("No session, skipping scheduled revalidation");
                    continue;
                }
                let outcome = controller.revalidate_token().await;
                debug!(?outcome, "Scheduled revalidation finished");
            }
        });

        Self { handle }
    }

    /// Abort the background task.
    pub fn stop(self) {
        self.handle.abort();
        info!("Revalidation timer stopped");
    }
}

impl Drop for RevalidationTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
