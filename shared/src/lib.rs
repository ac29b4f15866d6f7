//! Shared types for the canteen ordering portal
//!
//! Common types used across the portal crates: domain models, the
//! stock availability calculator, session/claims types, and the
//! unified error system.

pub mod error;
pub mod models;
pub mod session;
pub mod stock;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use session::{Role, Session};
pub use stock::{StockPolicy, StockTier};
