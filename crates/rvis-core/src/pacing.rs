//! Inter-page pacing for polite crawling.
//!
//! The crawl is strictly sequential, so pacing is a plain pause between one
//! page being persisted and the next form submission. The pause keeps the
//! request rate low enough not to trip the site's anti-bot defenses.

use std::time::Duration;

/// The fixed pause between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    pub delay: Duration,
}

impl PacingConfig {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No pause at all. Used by tests and offline runs.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::debug!(delay_ms = %self.delay.as_millis(), "Pausing before next page");
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for PacingConfig {
    /// One second between pages.
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
