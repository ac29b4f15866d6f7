//! Top-level entry point wiring the coordinators to the network stack

use crate::http::NetworkHttpApi;
use crate::provisioning::ProvisioningCoordinator;
use crate::services::{HttpCatalog, HttpOrderLedger, HttpWalletLedger};
use crate::{checkout::OrderPlacement, ClientConfig, ClientResult};

/// The portal client: one transport, one coordinator per concern
///
/// All services share the same [`NetworkHttpApi`] (reqwest pools the
/// underlying connections), so cloning a coordinator out of the portal
/// is cheap.
#[derive(Debug, Clone)]
pub struct Portal {
    config: ClientConfig,
    placement: OrderPlacement<HttpWalletLedger<NetworkHttpApi>, HttpOrderLedger<NetworkHttpApi>>,
    provisioning: ProvisioningCoordinator<HttpCatalog<NetworkHttpApi>>,
}

impl Portal {
    /// Build a portal client from configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = NetworkHttpApi::new(&config)?;
        let placement = OrderPlacement::new(
            HttpWalletLedger::new(http.clone()),
            HttpOrderLedger::new(http.clone()),
        );
        let provisioning = ProvisioningCoordinator::new(HttpCatalog::new(http));
        Ok(Self {
            config,
            placement,
            provisioning,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Order placement saga and order history
    pub fn placement(
        &self,
    ) -> &OrderPlacement<HttpWalletLedger<NetworkHttpApi>, HttpOrderLedger<NetworkHttpApi>> {
        &self.placement
    }

    /// Daily-menu provisioning
    pub fn provisioning(&self) -> &ProvisioningCoordinator<HttpCatalog<NetworkHttpApi>> {
        &self.provisioning
    }
}
