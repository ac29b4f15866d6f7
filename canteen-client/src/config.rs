//! Client configuration

use shared::stock::StockPolicy;

/// Client configuration for connecting to the portal's backing services
///
/// Carries no credential: the bearer token travels with the
/// [`shared::Session`] handed to each coordinator call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout in seconds, applied to every network step
    pub timeout_secs: u64,

    /// Thresholds for stock tier classification
    pub stock_policy: StockPolicy,

    /// Seed quantity for newly drafted daily items
    pub default_seed_qty: i32,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
            stock_policy: StockPolicy::default(),
            default_seed_qty: 1,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the stock tier thresholds
    pub fn with_stock_policy(mut self, policy: StockPolicy) -> Self {
        self.stock_policy = policy;
        self
    }

    /// Set the seed quantity for provisioning drafts
    pub fn with_seed_qty(mut self, qty: i32) -> Self {
        self.default_seed_qty = qty;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = ClientConfig::new("http://canteen.local")
            .with_timeout(10)
            .with_seed_qty(5);
        assert_eq!(config.base_url, "http://canteen.local");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.default_seed_qty, 5);
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.default_seed_qty, 1);
    }
}
