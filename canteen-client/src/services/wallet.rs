//! Wallet ledger service interface

use super::expect_data;
use crate::http::HttpApi;
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use shared::error::{ApiResponse, ErrorCode};
use shared::models::{CreditRequest, DebitRequest, RechargeRecord, Wallet};
use shared::Session;
use uuid::Uuid;

/// Result of a conditional debit
///
/// The ledger decrements only when the balance covers the amount,
/// atomically server-side; the orchestrator never performs a separate
/// check-then-write against a cached balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// Debit applied; the returned balance reflects it
    Applied { new_balance: i64 },
    /// Balance did not cover the amount; nothing was mutated
    InsufficientFunds,
}

/// Wallet ledger capability
///
/// Every call authenticates as the passed session; implementations
/// forward its bearer token.
#[async_trait]
pub trait WalletLedger: Send + Sync {
    /// Current balance in cents
    async fn balance(&self, session: &Session, student_id: &str) -> ClientResult<i64>;

    /// Conditional debit carrying a caller-generated reference
    async fn debit(
        &self,
        session: &Session,
        student_id: &str,
        amount: i64,
        reference: Uuid,
    ) -> ClientResult<DebitOutcome>;

    /// Credit, used for top-ups and compensating refunds
    async fn credit(&self, session: &Session, student_id: &str, amount: i64) -> ClientResult<i64>;

    /// Top-up history for a student
    async fn recharge_history(
        &self,
        session: &Session,
        student_id: &str,
    ) -> ClientResult<Vec<RechargeRecord>>;
}

/// HTTP-backed wallet ledger
#[derive(Debug, Clone)]
pub struct HttpWalletLedger<H: HttpApi> {
    http: H,
}

impl<H: HttpApi> HttpWalletLedger<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<H: HttpApi> WalletLedger for HttpWalletLedger<H> {
    async fn balance(&self, session: &Session, student_id: &str) -> ClientResult<i64> {
        let resp: ApiResponse<Wallet> = self
            .http
            .get(&format!("api/wallet/{}", student_id), Some(&session.token))
            .await?;
        Ok(expect_data(resp, "wallet")?.balance)
    }

    async fn debit(
        &self,
        session: &Session,
        student_id: &str,
        amount: i64,
        reference: Uuid,
    ) -> ClientResult<DebitOutcome> {
        let body = DebitRequest { amount, reference };
        let result: ClientResult<ApiResponse<Wallet>> = self
            .http
            .post(
                &format!("api/wallet/{}/debit", student_id),
                Some(&session.token),
                &body,
            )
            .await;
        match result {
            Ok(resp) => {
                let wallet = expect_data(resp, "wallet")?;
                Ok(DebitOutcome::Applied {
                    new_balance: wallet.balance,
                })
            }
            Err(ClientError::Api(err)) if err.code == ErrorCode::InsufficientFunds => {
                Ok(DebitOutcome::InsufficientFunds)
            }
            Err(err) => Err(err),
        }
    }

    async fn credit(&self, session: &Session, student_id: &str, amount: i64) -> ClientResult<i64> {
        let body = CreditRequest { amount };
        let resp: ApiResponse<Wallet> = self
            .http
            .post(
                &format!("api/wallet/{}/credit", student_id),
                Some(&session.token),
                &body,
            )
            .await?;
        Ok(expect_data(resp, "wallet")?.balance)
    }

    async fn recharge_history(
        &self,
        session: &Session,
        student_id: &str,
    ) -> ClientResult<Vec<RechargeRecord>> {
        let resp: ApiResponse<Vec<RechargeRecord>> = self
            .http
            .get(
                &format!("api/wallet/{}/recharges", student_id),
                Some(&session.token),
            )
            .await?;
        expect_data(resp, "recharge history")
    }
}
