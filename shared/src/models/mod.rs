//! Domain models shared across the portal crates

mod item;
mod order;
mod wallet;

pub use item::{DailyItem, DailyItemCreate, MasterItem, ProvisioningDraft};
pub use order::{Order, OrderLine, OrderStatus, PlaceOrderRequest};
pub use wallet::{CreditRequest, DebitRequest, RechargeRecord, Wallet};
