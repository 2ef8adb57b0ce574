//! Politeness pacing between requests
//!
//! The walker never sleeps directly. It reports every finished product and
//! page attempt to a [`Throttle`], which decides how long to wait.

use async_trait::async_trait;
use std::time::Duration;

/// Pacing hook called by the catalog walker
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Called after every product attempt, successful or not
    async fn after_product(&self);

    /// Called after every catalog page attempt, including failed and empty pages
    async fn after_page(&self);
}

/// Fixed pauses after products and pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    /// Pause after each product
    pub product: Duration,

    /// Pause after each catalog page
    pub page: Duration,
}

impl FixedDelay {
    /// Creates a throttle from millisecond delays
    pub fn from_millis(product_ms: u64, page_ms: u64) -> Self {
        Self {
            product: Duration::from_millis(product_ms),
            page: Duration::from_millis(page_ms),
        }
    }

    /// A throttle that never waits
    pub fn none() -> Self {
        Self::from_millis(0, 0)
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::from_millis(600, 800)
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn after_product(&self) {
        if !self.product.is_zero() {
            tokio::time::sleep(self.product).await;
        }
    }

    async fn after_page(&self) {
        if !self.page.is_zero() {
            tokio::time::sleep(self.page).await;
        }
    }
}
