//! Order ledger service interface

use super::expect_data;
use crate::http::HttpApi;
use crate::ClientResult;
use async_trait::async_trait;
use shared::error::ApiResponse;
use shared::models::{Order, OrderStatus, PlaceOrderRequest};
use shared::Session;

/// Order ledger capability
///
/// Every call authenticates as the passed session; implementations
/// forward its bearer token.
#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Create an order record. Idempotent on the request's
    /// `idempotency_key`: a repeated key returns the already-created
    /// order instead of creating a second one.
    async fn create_order(
        &self,
        session: &Session,
        request: &PlaceOrderRequest,
    ) -> ClientResult<Order>;

    /// Transition an order's status
    async fn update_status(
        &self,
        session: &Session,
        order_id: &str,
        status: OrderStatus,
    ) -> ClientResult<Order>;

    /// Order history for a student
    async fn orders_for_student(
        &self,
        session: &Session,
        student_id: &str,
    ) -> ClientResult<Vec<Order>>;

    /// Orders in a given status, for admin tracking
    async fn orders_by_status(
        &self,
        session: &Session,
        status: OrderStatus,
    ) -> ClientResult<Vec<Order>>;
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusRequest {
    status: OrderStatus,
}

/// HTTP-backed order ledger
#[derive(Debug, Clone)]
pub struct HttpOrderLedger<H: HttpApi> {
    http: H,
}

impl<H: HttpApi> HttpOrderLedger<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<H: HttpApi> OrderLedger for HttpOrderLedger<H> {
    async fn create_order(
        &self,
        session: &Session,
        request: &PlaceOrderRequest,
    ) -> ClientResult<Order> {
        let resp: ApiResponse<Order> = self
            .http
            .post("api/orders", Some(&session.token), request)
            .await?;
        expect_data(resp, "order")
    }

    async fn update_status(
        &self,
        session: &Session,
        order_id: &str,
        status: OrderStatus,
    ) -> ClientResult<Order> {
        let body = UpdateStatusRequest { status };
        let resp: ApiResponse<Order> = self
            .http
            .post(
                &format!("api/orders/{}/status", order_id),
                Some(&session.token),
                &body,
            )
            .await?;
        expect_data(resp, "order")
    }

    async fn orders_for_student(
        &self,
        session: &Session,
        student_id: &str,
    ) -> ClientResult<Vec<Order>> {
        let resp: ApiResponse<Vec<Order>> = self
            .http
            .get(
                &format!("api/orders/student/{}", student_id),
                Some(&session.token),
            )
            .await?;
        expect_data(resp, "orders")
    }

    async fn orders_by_status(
        &self,
        session: &Session,
        status: OrderStatus,
    ) -> ClientResult<Vec<Order>> {
        let resp: ApiResponse<Vec<Order>> = self
            .http
            .get(
                &format!("api/orders/status/{}", status.as_str()),
                Some(&session.token),
            )
            .await?;
        expect_data(resp, "orders")
    }
}
