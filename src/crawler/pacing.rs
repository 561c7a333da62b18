//! Request pacing
//!
//! Pacing is unconditional: a fixed pause between company detail requests,
//! a longer one between listing pages, and an exponential back-off before
//! retries. The policy is injectable so tests can run without sleeping.

use crate::config::DelayConfig;
use std::time::Duration;

/// The kind of pause the page loop is about to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Between two company detail requests
    BetweenDetails,

    /// After all companies of a listing page were processed
    BetweenPages,

    /// Before retry number `n` (1-based) of a failed request
    Retry(u32),
}

/// Maps a pause kind to how long to wait
pub trait Pacing: Send + Sync {
    fn delay(&self, pause: Pause) -> Duration;
}

impl<F> Pacing for F
where
    F: Fn(Pause) -> Duration + Send + Sync,
{
    fn delay(&self, pause: Pause) -> Duration {
        self(pause)
    }
}

/// Fixed delays taken from the `[delays]` configuration section
#[derive(Debug, Clone)]
pub struct FixedPacing {
    between_details: Duration,
    between_pages: Duration,
    retry_base: Duration,
}

impl FixedPacing {
    pub fn new(between_details: Duration, between_pages: Duration) -> Self {
        Self {
            between_details,
            between_pages,
            retry_base: Duration::from_secs(1),
        }
    }

    pub fn from_config(config: &DelayConfig) -> Self {
        Self::new(
            Duration::from_millis(config.between_companies_ms),
            Duration::from_millis(config.between_pages_ms),
        )
    }
}

impl Pacing for FixedPacing {
    fn delay(&self, pause: Pause) -> Duration {
        match pause {
            Pause::BetweenDetails => self.between_details,
            Pause::BetweenPages => self.between_pages,
            // 1s, 2s, 4s, ... capped at 64s
            Pause::Retry(attempt) => {
                let exponent = attempt.saturating_sub(1).min(6);
                self.retry_base * 2u32.pow(exponent)
            }
        }
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacing for NoPacing {
    fn delay(&self, _pause: Pause) -> Duration {
        Duration::ZERO
    }
}

/// Sleeps for as long as `pacing` says `pause` should last
pub async fn pause(pacing: &dyn Pacing, pause: Pause) {
    let delay = pacing.delay(pause);
    if !delay.is_zero() {
        tracing::trace!("Pausing {:?} ({:?})", delay, pause);
        tokio::time::sleep(delay).await;
    }
}
