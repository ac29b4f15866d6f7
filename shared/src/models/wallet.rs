//! Wallet ledger models
//!
//! The wallet is owned exclusively by the ledger service and mutated
//! only through debit/credit. Balance is cents, never negative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student's spendable balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub student_id: String,
    /// Balance in cents; the ledger guarantees it never goes negative
    pub balance: i64,
}

/// Conditional debit payload
///
/// The ledger decrements only if `balance >= amount`, atomically
/// server-side. The reference ties the debit to the order-creation
/// idempotency key so a retried order can be matched to its payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebitRequest {
    /// Amount in cents
    pub amount: i64,
    /// Caller-generated debit reference
    pub reference: Uuid,
}

/// Credit payload, used both for top-ups and compensating refunds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRequest {
    /// Amount in cents
    pub amount: i64,
}

/// One top-up entry in a student's recharge history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeRecord {
    pub student_id: String,
    /// Amount in cents
    pub amount: i64,
    pub time: DateTime<Utc>,
}
