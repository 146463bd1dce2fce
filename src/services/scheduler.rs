use std::time::Duration;
use tokio::task::JoinHandle;

use crate::core::PremiumService;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Periodically downgrades premium users whose subscription has expired
///
/// Between expiry and the next sweep a user keeps their premium flag;
/// discovery reads the flag as stored.
pub struct PremiumExpirySweeper {
    premium: PremiumService,
    interval: Duration,
}

impl PremiumExpirySweeper {
    pub fn new(premium: PremiumService, interval: Duration) -> Self {
        Self { premium, interval }
    }

    /// Run one sweep, logging instead of propagating failures
    pub async fn sweep_once(&self) -> usize {
        match self.premium.expire_lapsed().await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("Premium expiry sweep failed: {}", e);
                0
            }
        }
    }

    /// Start the sweep loop on the current runtime. The first sweep runs one
    /// full interval after start. Intervals under a second are raised to one.
    pub fn spawn(self) -> JoinHandle<()> {
        let period = self.interval.max(MIN_INTERVAL);
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                let downgraded = self.sweep_once().await;
                tracing::debug!("Premium sweep finished, {} users downgraded", downgraded);
            }
        })
    }
}
