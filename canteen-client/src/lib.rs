//! Client library for the campus canteen ordering portal
//!
//! Coordinates the portal's three backing services (wallet ledger,
//! order ledger, catalog) from the student and admin sides:
//!
//! - [`checkout`]: the debit-then-order placement saga with
//!   compensating credit
//! - [`reconcile`]: merging the master catalog with the daily snapshot
//!   and drafting provisioning candidates
//! - [`provisioning`]: committing draft batches to the catalog service
//! - [`portal`]: one-stop wiring over the reqwest transport
//!
//! Coordinators are generic over the service traits in [`services`],
//! so tests drive them with in-memory fakes.

pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod portal;
pub mod provisioning;
pub mod reconcile;
pub mod services;

pub use checkout::{OrderPlacement, PlacementOutcome};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use portal::Portal;
pub use provisioning::{ProvisionOutcome, ProvisionReport, ProvisioningCoordinator};
pub use reconcile::{MatchSource, MenuRow, Reconciliation};

// Re-export the shared crate for downstream callers
pub use shared;
