//! Order placement saga
//!
//! Placement spans two services with no shared transaction: the wallet
//! ledger debits first, then the order ledger records the order. A
//! sustained order-creation failure after a successful debit is repaired
//! by a compensating credit; if that credit also fails, the outcome
//! carries everything an operator needs to reconcile by hand. Money is
//! never silently lost: every post-debit path is a typed outcome, not
//! an `Err`.

use crate::auth;
use crate::services::{DebitOutcome, OrderLedger, WalletLedger};
use crate::{ClientError, ClientResult};
use shared::models::{Order, OrderLine, OrderStatus, PlaceOrderRequest};
use shared::Session;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Terminal states of a placement attempt
///
/// `Err` from [`OrderPlacement::place_order`] means nothing was
/// mutated remotely. Once the debit has landed, the attempt always
/// resolves to `Ok` with one of the post-debit variants.
#[derive(Debug)]
pub enum PlacementOutcome {
    /// Debit and order both landed
    Completed { order: Order, new_balance: i64 },
    /// The ledger refused the debit; nothing was charged
    InsufficientFunds { balance: i64, required: i64 },
    /// Order creation failed after the debit; the compensating credit
    /// restored the balance
    Refunded {
        debit_reference: Uuid,
        amount: i64,
        cause: ClientError,
    },
    /// Order creation failed after the debit and the compensating
    /// credit also failed. The wallet is short `amount`; manual
    /// reconciliation against `debit_reference` is required.
    CompensationRequired {
        debit_reference: Uuid,
        amount: i64,
        cause: ClientError,
        credit_error: ClientError,
    },
}

/// Orchestrates the debit-then-order placement saga
#[derive(Debug, Clone)]
pub struct OrderPlacement<W: WalletLedger, O: OrderLedger> {
    wallet: W,
    orders: O,
}

impl<W: WalletLedger, O: OrderLedger> OrderPlacement<W, O> {
    pub fn new(wallet: W, orders: O) -> Self {
        Self { wallet, orders }
    }

    /// Run the placement saga for the session's student
    pub async fn place_order(
        &self,
        session: &Session,
        lines: Vec<OrderLine>,
    ) -> ClientResult<PlacementOutcome> {
        auth::ensure_active(session)?;
        validate_lines(&lines)?;
        let total: i64 = lines.iter().map(OrderLine::line_total).sum();
        let student_id = session.subject_id.as_str();

        // Advisory pre-check only. The ledger's conditional debit is
        // the authority; this just spares a doomed round-trip and
        // gives the caller the current balance to show.
        let balance = self.wallet.balance(session, student_id).await?;
        if balance < total {
            return Ok(PlacementOutcome::InsufficientFunds {
                balance,
                required: total,
            });
        }

        let reference = Uuid::new_v4();
        let new_balance = match self
            .wallet
            .debit(session, student_id, total, reference)
            .await?
        {
            DebitOutcome::Applied { new_balance } => new_balance,
            DebitOutcome::InsufficientFunds => {
                // Raced a concurrent spend between pre-check and debit
                let balance = self
                    .wallet
                    .balance(session, student_id)
                    .await
                    .unwrap_or(balance);
                return Ok(PlacementOutcome::InsufficientFunds {
                    balance,
                    required: total,
                });
            }
        };
        info!(student_id, amount = total, reference = %reference, "wallet debited");

        // From here on money has moved; every path must resolve it
        let request = PlaceOrderRequest {
            student_id: student_id.to_string(),
            items: lines,
            total,
            idempotency_key: reference,
        };
        let cause = match self.create_with_retry(session, &request).await {
            Ok(order) => {
                info!(order_id = %order.order_id, student_id, "order placed");
                return Ok(PlacementOutcome::Completed { order, new_balance });
            }
            Err(cause) => cause,
        };

        warn!(
            student_id,
            reference = %reference,
            error = %cause,
            "order creation failed after debit, issuing compensating credit"
        );
        match self.wallet.credit(session, student_id, total).await {
            Ok(_) => Ok(PlacementOutcome::Refunded {
                debit_reference: reference,
                amount: total,
                cause,
            }),
            Err(credit_error) => {
                error!(
                    student_id,
                    reference = %reference,
                    amount = total,
                    error = %credit_error,
                    "compensating credit failed, manual reconciliation required"
                );
                Ok(PlacementOutcome::CompensationRequired {
                    debit_reference: reference,
                    amount: total,
                    cause,
                    credit_error,
                })
            }
        }
    }

    /// One retry on transient failure, same idempotency key. The order
    /// ledger deduplicates on the key, so a retry after an ambiguous
    /// timeout cannot double-create.
    async fn create_with_retry(
        &self,
        session: &Session,
        request: &PlaceOrderRequest,
    ) -> ClientResult<Order> {
        match self.orders.create_order(session, request).await {
            Ok(order) => Ok(order),
            Err(err) if err.is_transient() => {
                warn!(
                    idempotency_key = %request.idempotency_key,
                    error = %err,
                    "order creation failed transiently, retrying once"
                );
                self.orders.create_order(session, request).await
            }
            Err(err) => Err(err),
        }
    }

    /// Mark a pending order served
    pub async fn fulfill(&self, session: &Session, order: &Order) -> ClientResult<Order> {
        self.transition(session, order, OrderStatus::Served).await
    }

    /// Cancel a pending order
    pub async fn cancel(&self, session: &Session, order: &Order) -> ClientResult<Order> {
        self.transition(session, order, OrderStatus::Cancelled).await
    }

    async fn transition(
        &self,
        session: &Session,
        order: &Order,
        to: OrderStatus,
    ) -> ClientResult<Order> {
        auth::ensure_admin(session)?;
        if order.status.is_terminal() {
            return Err(ClientError::Validation(format!(
                "order {} is already {}",
                order.order_id,
                order.status.as_str()
            )));
        }
        self.orders.update_status(session, &order.order_id, to).await
    }

    /// Order history for the session's student
    pub async fn history(&self, session: &Session) -> ClientResult<Vec<Order>> {
        auth::ensure_active(session)?;
        self.orders
            .orders_for_student(session, &session.subject_id)
            .await
    }

    /// Open orders across students, for the serving queue
    pub async fn pending_queue(&self, session: &Session) -> ClientResult<Vec<Order>> {
        auth::ensure_admin(session)?;
        self.orders
            .orders_by_status(session, OrderStatus::Pending)
            .await
    }
}

fn validate_lines(lines: &[OrderLine]) -> ClientResult<()> {
    if lines.is_empty() {
        return Err(ClientError::Validation("order has no items".to_string()));
    }
    for line in lines {
        if line.qty <= 0 {
            return Err(ClientError::Validation(format!(
                "non-positive quantity for item {}",
                line.master_item_id
            )));
        }
        if line.unit_price < 0 {
            return Err(ClientError::Validation(format!(
                "negative price for item {}",
                line.master_item_id
            )));
        }
    }
    Ok(())
}
