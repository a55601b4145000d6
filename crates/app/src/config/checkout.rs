//! Checkout Config

use std::time::Duration;

use clap::Args;

/// Checkout settings.
#[derive(Debug, Clone, Args)]
pub struct CheckoutConfig {
    /// Longest a checkout waits for a product row lock, in milliseconds. 0 waits indefinitely.
    #[arg(long, env = "CHECKOUT_LOCK_TIMEOUT_MS", default_value_t = 5_000)]
    pub lock_timeout_ms: u64,
}

impl CheckoutConfig {
    #[must_use]
    pub fn lock_timeout(&self) -> Option<Duration> {
        (self.lock_timeout_ms > 0).then(|| Duration::from_millis(self.lock_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_disables_the_lock_timeout() {
        let config = CheckoutConfig { lock_timeout_ms: 0 };

        assert_eq!(config.lock_timeout(), None);
    }

    #[test]
    fn lock_timeout_is_in_milliseconds() {
        let config = CheckoutConfig {
            lock_timeout_ms: 250,
        };

        assert_eq!(config.lock_timeout(), Some(Duration::from_millis(250)));
    }
}
