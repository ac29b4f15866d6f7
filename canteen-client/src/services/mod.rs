//! Capability-typed interfaces to the backing services
//!
//! Each external collaborator (wallet ledger, order ledger, catalog)
//! is a trait; the `Http*` implementations speak the services' JSON
//! envelope over [`crate::http::HttpApi`]. Coordinators depend on the
//! traits only, which is also the seam the tests mock.

mod catalog;
mod orders;
mod wallet;

pub use catalog::{Catalog, HttpCatalog};
pub use orders::{HttpOrderLedger, OrderLedger};
pub use wallet::{DebitOutcome, HttpWalletLedger, WalletLedger};

use crate::{ClientError, ClientResult};
use shared::error::ApiResponse;

/// Unwrap a service envelope, requiring a data payload
pub(crate) fn expect_data<T>(resp: ApiResponse<T>, what: &str) -> ClientResult<T> {
    if !resp.is_success() {
        return Err(ClientError::InvalidResponse(format!(
            "error envelope on 2xx response for {}: {}",
            what, resp.message
        )));
    }
    resp.data
        .ok_or_else(|| ClientError::InvalidResponse(format!("missing {} data", what)))
}

/// Unwrap a service envelope for operations without a payload
pub(crate) fn expect_ok(resp: ApiResponse<()>, what: &str) -> ClientResult<()> {
    if !resp.is_success() {
        return Err(ClientError::InvalidResponse(format!(
            "error envelope on 2xx response for {}: {}",
            what, resp.message
        )));
    }
    Ok(())
}
