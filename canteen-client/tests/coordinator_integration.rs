//! Coordinator tests against in-memory service fakes
//!
//! Drives the placement saga and the provisioning coordinator through
//! the service traits, injecting the failures the real services can
//! produce: refused debits, ambiguous order-creation timeouts, failed
//! compensating credits, duplicate daily rejections.

use async_trait::async_trait;
use canteen_client::checkout::{OrderPlacement, PlacementOutcome};
use canteen_client::http::HttpApi;
use canteen_client::provisioning::{ProvisionOutcome, ProvisioningCoordinator};
use canteen_client::services::{
    Catalog, DebitOutcome, HttpWalletLedger, OrderLedger, WalletLedger,
};
use canteen_client::{ClientError, ClientResult};
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DailyItem, DailyItemCreate, MasterItem, Order, OrderLine, OrderStatus, PlaceOrderRequest,
    ProvisioningDraft, RechargeRecord,
};
use shared::{Role, Session};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canteen_client=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn student() -> Session {
    Session::new(
        "stu-1",
        Role::Student,
        Utc::now() + Duration::hours(1),
        "stu-1-token",
    )
}

fn admin() -> Session {
    Session::new(
        "adm-1",
        Role::Admin,
        Utc::now() + Duration::hours(1),
        "adm-1-token",
    )
}

fn expired_student() -> Session {
    Session::new(
        "stu-1",
        Role::Student,
        Utc::now() - Duration::hours(1),
        "stu-1-token",
    )
}

fn line(id: &str, qty: i32, price: i64) -> OrderLine {
    OrderLine {
        master_item_id: id.into(),
        qty,
        unit_price: price,
    }
}

// ==================== Wallet fake ====================

#[derive(Default)]
struct WalletState {
    balances: Mutex<HashMap<String, i64>>,
    debits: Mutex<Vec<(String, i64, Uuid)>>,
    fail_credit: AtomicBool,
}

#[derive(Clone, Default)]
struct FakeWallet {
    state: Arc<WalletState>,
}

impl FakeWallet {
    fn with_balance(student_id: &str, balance: i64) -> Self {
        let wallet = Self::default();
        wallet
            .state
            .balances
            .lock()
            .unwrap()
            .insert(student_id.to_string(), balance);
        wallet
    }

    fn balance_of(&self, student_id: &str) -> i64 {
        *self.state.balances.lock().unwrap().get(student_id).unwrap()
    }

    fn debit_count(&self) -> usize {
        self.state.debits.lock().unwrap().len()
    }
}

#[async_trait]
impl WalletLedger for FakeWallet {
    async fn balance(&self, _session: &Session, student_id: &str) -> ClientResult<i64> {
        self.state
            .balances
            .lock()
            .unwrap()
            .get(student_id)
            .copied()
            .ok_or_else(|| ClientError::NotFound("wallet".into()))
    }

    async fn debit(
        &self,
        _session: &Session,
        student_id: &str,
        amount: i64,
        reference: Uuid,
    ) -> ClientResult<DebitOutcome> {
        let mut balances = self.state.balances.lock().unwrap();
        let balance = balances
            .get_mut(student_id)
            .ok_or_else(|| ClientError::NotFound("wallet".into()))?;
        if *balance < amount {
            return Ok(DebitOutcome::InsufficientFunds);
        }
        *balance -= amount;
        self.state
            .debits
            .lock()
            .unwrap()
            .push((student_id.to_string(), amount, reference));
        Ok(DebitOutcome::Applied {
            new_balance: *balance,
        })
    }

    async fn credit(
        &self,
        _session: &Session,
        student_id: &str,
        amount: i64,
    ) -> ClientResult<i64> {
        if self.state.fail_credit.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout);
        }
        let mut balances = self.state.balances.lock().unwrap();
        let balance = balances
            .get_mut(student_id)
            .ok_or_else(|| ClientError::NotFound("wallet".into()))?;
        *balance += amount;
        Ok(*balance)
    }

    async fn recharge_history(
        &self,
        _session: &Session,
        _student_id: &str,
    ) -> ClientResult<Vec<RechargeRecord>> {
        Ok(Vec::new())
    }
}

// ==================== Order ledger fake ====================

#[derive(Default)]
struct OrderState {
    by_key: Mutex<HashMap<Uuid, Order>>,
    /// Persist the order but report a timeout; models a response lost
    /// on the wire
    ambiguous_timeouts: AtomicUsize,
    /// Reject without persisting
    hard_failures: AtomicUsize,
}

#[derive(Clone, Default)]
struct FakeOrders {
    state: Arc<OrderState>,
}

impl FakeOrders {
    fn order_count(&self) -> usize {
        self.state.by_key.lock().unwrap().len()
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl OrderLedger for FakeOrders {
    async fn create_order(
        &self,
        _session: &Session,
        request: &PlaceOrderRequest,
    ) -> ClientResult<Order> {
        if Self::take_failure(&self.state.hard_failures) {
            return Err(ClientError::Timeout);
        }
        let order = self
            .state
            .by_key
            .lock()
            .unwrap()
            .entry(request.idempotency_key)
            .or_insert_with(|| Order {
                order_id: format!("ord-{}", request.idempotency_key),
                student_id: request.student_id.clone(),
                time: Utc::now(),
                status: OrderStatus::Pending,
                amount: request.total,
                items: request.items.clone(),
            })
            .clone();
        if Self::take_failure(&self.state.ambiguous_timeouts) {
            return Err(ClientError::Timeout);
        }
        Ok(order)
    }

    async fn update_status(
        &self,
        _session: &Session,
        order_id: &str,
        status: OrderStatus,
    ) -> ClientResult<Order> {
        let mut by_key = self.state.by_key.lock().unwrap();
        let order = by_key
            .values_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| ClientError::NotFound("order".into()))?;
        order.status = status;
        Ok(order.clone())
    }

    async fn orders_for_student(
        &self,
        _session: &Session,
        student_id: &str,
    ) -> ClientResult<Vec<Order>> {
        Ok(self
            .state
            .by_key
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn orders_by_status(
        &self,
        _session: &Session,
        status: OrderStatus,
    ) -> ClientResult<Vec<Order>> {
        Ok(self
            .state
            .by_key
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect())
    }
}

// ==================== Catalog fake ====================

#[derive(Default)]
struct CatalogState {
    daily: Mutex<Vec<DailyItem>>,
    reject_master_ids: Mutex<Vec<String>>,
    fail_snapshot: AtomicBool,
}

#[derive(Clone, Default)]
struct FakeCatalog {
    state: Arc<CatalogState>,
}

impl FakeCatalog {
    fn rejecting(ids: &[&str]) -> Self {
        let catalog = Self::default();
        *catalog.state.reject_master_ids.lock().unwrap() =
            ids.iter().map(|s| s.to_string()).collect();
        catalog
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn list_master_items(&self, _session: &Session) -> ClientResult<Vec<MasterItem>> {
        Ok(Vec::new())
    }

    async fn list_daily_items(&self, _session: &Session) -> ClientResult<Vec<DailyItem>> {
        if self.state.fail_snapshot.load(Ordering::SeqCst) {
            return Err(ClientError::Timeout);
        }
        Ok(self.state.daily.lock().unwrap().clone())
    }

    async fn create_daily_item(
        &self,
        _session: &Session,
        create: &DailyItemCreate,
    ) -> ClientResult<DailyItem> {
        if self
            .state
            .reject_master_ids
            .lock()
            .unwrap()
            .contains(&create.master_item_id)
        {
            return Err(ClientError::Api(AppError::duplicate_daily_item(
                &*create.master_item_id,
            )));
        }
        let mut daily = self.state.daily.lock().unwrap();
        let item = DailyItem {
            daily_id: format!("d-{}", daily.len() + 1),
            master_item_id: Some(create.master_item_id.clone()),
            item_name: None,
            item_price: None,
            item_category: None,
            initial_qty: create.initial_qty,
            sold_qty: 0,
        };
        daily.push(item.clone());
        Ok(item)
    }

    async fn delete_daily_item(&self, _session: &Session, daily_id: &str) -> ClientResult<()> {
        let mut daily = self.state.daily.lock().unwrap();
        let before = daily.len();
        daily.retain(|d| d.daily_id != daily_id);
        if daily.len() == before {
            return Err(ClientError::NotFound("daily item".into()));
        }
        Ok(())
    }
}

// ==================== Transport fake ====================

/// Records the bearer credential each request carried and replies
/// with a canned envelope.
struct TransportState {
    bearers: Mutex<Vec<Option<String>>>,
    reply: serde_json::Value,
}

#[derive(Clone)]
struct RecordingHttp {
    state: Arc<TransportState>,
}

impl RecordingHttp {
    fn with_reply(reply: serde_json::Value) -> Self {
        Self {
            state: Arc::new(TransportState {
                bearers: Mutex::new(Vec::new()),
                reply,
            }),
        }
    }

    fn record(&self, bearer: Option<&str>) {
        self.state
            .bearers
            .lock()
            .unwrap()
            .push(bearer.map(String::from));
    }

    fn bearers(&self) -> Vec<Option<String>> {
        self.state.bearers.lock().unwrap().clone()
    }

    fn reply<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_value(self.state.reply.clone())?)
    }
}

#[async_trait]
impl HttpApi for RecordingHttp {
    async fn get<T: DeserializeOwned>(
        &self,
        _path: &str,
        bearer: Option<&str>,
    ) -> ClientResult<T> {
        self.record(bearer);
        self.reply()
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        _path: &str,
        bearer: Option<&str>,
        _body: &B,
    ) -> ClientResult<T> {
        self.record(bearer);
        self.reply()
    }

    async fn delete<T: DeserializeOwned>(
        &self,
        _path: &str,
        bearer: Option<&str>,
    ) -> ClientResult<T> {
        self.record(bearer);
        self.reply()
    }
}

fn drafts(ids: &[&str]) -> Vec<ProvisioningDraft> {
    ids.iter()
        .map(|id| {
            ProvisioningDraft::from_master(
                &MasterItem {
                    id: id.to_string(),
                    name: format!("Item {}", id),
                    price: 5000,
                    category: "Lunch".into(),
                },
                3,
            )
        })
        .collect()
}

// ==================== Placement saga ====================

#[tokio::test]
async fn test_placement_happy_path() {
    init_tracing();
    let wallet = FakeWallet::with_balance("stu-1", 20_000);
    let orders = FakeOrders::default();
    let placement = OrderPlacement::new(wallet.clone(), orders);

    let outcome = placement
        .place_order(&student(), vec![line("m-1", 2, 5_000), line("m-2", 1, 3_000)])
        .await
        .unwrap();

    match outcome {
        PlacementOutcome::Completed { order, new_balance } => {
            assert_eq!(order.amount, 13_000);
            assert_eq!(order.status, OrderStatus::Pending);
            assert_eq!(order.items.len(), 2);
            assert_eq!(new_balance, 7_000);
        }
        other => panic!("expected Completed, got {:?}", other),
    }
    assert_eq!(wallet.balance_of("stu-1"), 7_000);
}

#[tokio::test]
async fn test_placement_insufficient_funds_charges_nothing() {
    let wallet = FakeWallet::with_balance("stu-1", 1_000);
    let orders = FakeOrders::default();
    let placement = OrderPlacement::new(wallet.clone(), orders.clone());

    let outcome = placement
        .place_order(&student(), vec![line("m-1", 1, 5_000)])
        .await
        .unwrap();

    match outcome {
        PlacementOutcome::InsufficientFunds { balance, required } => {
            assert_eq!(balance, 1_000);
            assert_eq!(required, 5_000);
        }
        other => panic!("expected InsufficientFunds, got {:?}", other),
    }
    assert_eq!(wallet.balance_of("stu-1"), 1_000);
    assert_eq!(wallet.debit_count(), 0);
    assert_eq!(orders.order_count(), 0);
}

#[tokio::test]
async fn test_placement_ambiguous_timeout_retries_same_key() {
    // First create persists server-side but the response is lost; the
    // retry must return the existing order, not create a second one
    let wallet = FakeWallet::with_balance("stu-1", 20_000);
    let orders = FakeOrders::default();
    orders.state.ambiguous_timeouts.store(1, Ordering::SeqCst);
    let placement = OrderPlacement::new(wallet, orders.clone());

    let outcome = placement
        .place_order(&student(), vec![line("m-1", 1, 5_000)])
        .await
        .unwrap();

    assert!(matches!(outcome, PlacementOutcome::Completed { .. }));
    assert_eq!(orders.order_count(), 1);
}

#[tokio::test]
async fn test_placement_sustained_failure_refunds() {
    let wallet = FakeWallet::with_balance("stu-1", 20_000);
    let orders = FakeOrders::default();
    orders.state.hard_failures.store(2, Ordering::SeqCst);
    let placement = OrderPlacement::new(wallet.clone(), orders.clone());

    let outcome = placement
        .place_order(&student(), vec![line("m-1", 1, 5_000)])
        .await
        .unwrap();

    match outcome {
        PlacementOutcome::Refunded { amount, .. } => assert_eq!(amount, 5_000),
        other => panic!("expected Refunded, got {:?}", other),
    }
    // The debit happened, the compensating credit undid it
    assert_eq!(wallet.debit_count(), 1);
    assert_eq!(wallet.balance_of("stu-1"), 20_000);
    assert_eq!(orders.order_count(), 0);
}

#[tokio::test]
async fn test_placement_failed_refund_surfaces_compensation() {
    let wallet = FakeWallet::with_balance("stu-1", 20_000);
    wallet.state.fail_credit.store(true, Ordering::SeqCst);
    let orders = FakeOrders::default();
    orders.state.hard_failures.store(2, Ordering::SeqCst);
    let placement = OrderPlacement::new(wallet.clone(), orders);

    let outcome = placement
        .place_order(&student(), vec![line("m-1", 1, 5_000)])
        .await
        .unwrap();

    match outcome {
        PlacementOutcome::CompensationRequired {
            debit_reference,
            amount,
            ..
        } => {
            assert_eq!(amount, 5_000);
            // The reference ties the stranded debit to the attempt
            let debits = wallet.state.debits.lock().unwrap();
            assert_eq!(debits.len(), 1);
            assert_eq!(debits[0].2, debit_reference);
        }
        other => panic!("expected CompensationRequired, got {:?}", other),
    }
    // Balance stays short until manual reconciliation
    assert_eq!(wallet.balance_of("stu-1"), 15_000);
}

#[tokio::test]
async fn test_placement_rejects_expired_session_before_any_call() {
    let wallet = FakeWallet::with_balance("stu-1", 20_000);
    let placement = OrderPlacement::new(wallet.clone(), FakeOrders::default());

    let err = placement
        .place_order(&expired_student(), vec![line("m-1", 1, 5_000)])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::AuthExpired));
    assert_eq!(wallet.balance_of("stu-1"), 20_000);
}

#[tokio::test]
async fn test_placement_rejects_empty_order() {
    let wallet = FakeWallet::with_balance("stu-1", 20_000);
    let placement = OrderPlacement::new(wallet, FakeOrders::default());

    let err = placement
        .place_order(&student(), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_fulfill_requires_admin_and_pending() {
    let wallet = FakeWallet::with_balance("stu-1", 20_000);
    let placement = OrderPlacement::new(wallet, FakeOrders::default());

    let outcome = placement
        .place_order(&student(), vec![line("m-1", 1, 5_000)])
        .await
        .unwrap();
    let order = match outcome {
        PlacementOutcome::Completed { order, .. } => order,
        other => panic!("expected Completed, got {:?}", other),
    };

    // Students cannot serve orders
    let err = placement.fulfill(&student(), &order).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));

    let served = placement.fulfill(&admin(), &order).await.unwrap();
    assert_eq!(served.status, OrderStatus::Served);

    // Terminal orders refuse further transitions
    let err = placement.cancel(&admin(), &served).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_pending_queue_is_admin_only() {
    let wallet = FakeWallet::with_balance("stu-1", 20_000);
    let placement = OrderPlacement::new(wallet, FakeOrders::default());

    let err = placement.pending_queue(&student()).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
    assert!(placement.pending_queue(&admin()).await.unwrap().is_empty());
}

// ==================== Credential forwarding ====================

#[tokio::test]
async fn test_requests_carry_the_session_token() {
    // The credential on the wire is the session's, per call: two
    // sessions through one service must each see their own token
    let http = RecordingHttp::with_reply(json!({
        "code": 0,
        "message": "OK",
        "data": { "studentId": "stu-1", "balance": 5_000 }
    }));
    let wallet = HttpWalletLedger::new(http.clone());

    let alice = Session::new(
        "stu-1",
        Role::Student,
        Utc::now() + Duration::hours(1),
        "token-alice",
    );
    let bob = Session::new(
        "stu-2",
        Role::Student,
        Utc::now() + Duration::hours(1),
        "token-bob",
    );

    wallet.balance(&alice, "stu-1").await.unwrap();
    wallet.balance(&bob, "stu-2").await.unwrap();
    wallet
        .debit(&alice, "stu-1", 1_000, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(
        http.bearers(),
        vec![
            Some("token-alice".to_string()),
            Some("token-bob".to_string()),
            Some("token-alice".to_string()),
        ]
    );
}

// ==================== Provisioning ====================

#[tokio::test]
async fn test_provisioning_continues_past_failures() {
    init_tracing();
    let catalog = FakeCatalog::rejecting(&["m-2"]);
    let coordinator = ProvisioningCoordinator::new(catalog);

    let report = coordinator
        .commit(&admin(), drafts(&["m-1", "m-2", "m-3"]))
        .await
        .unwrap();

    assert_eq!(report.outcome(), ProvisionOutcome::Partial);
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].draft.master_item_id, "m-2");
    assert_eq!(
        report.failed[0].error.code(),
        Some(ErrorCode::DuplicateDailyItem)
    );
    // The refreshed snapshot reflects what actually landed
    assert_eq!(report.snapshot.as_ref().unwrap().len(), 2);
}

#[tokio::test]
async fn test_provisioning_all_succeeded_and_all_failed() {
    let coordinator = ProvisioningCoordinator::new(FakeCatalog::default());
    let report = coordinator.commit(&admin(), drafts(&["m-1"])).await.unwrap();
    assert_eq!(report.outcome(), ProvisionOutcome::AllSucceeded);

    let coordinator = ProvisioningCoordinator::new(FakeCatalog::rejecting(&["m-1"]));
    let report = coordinator.commit(&admin(), drafts(&["m-1"])).await.unwrap();
    assert_eq!(report.outcome(), ProvisionOutcome::AllFailed);
}

#[tokio::test]
async fn test_provisioning_snapshot_refresh_failure_keeps_results() {
    let catalog = FakeCatalog::default();
    catalog.state.fail_snapshot.store(true, Ordering::SeqCst);
    let coordinator = ProvisioningCoordinator::new(catalog);

    let report = coordinator
        .commit(&admin(), drafts(&["m-1", "m-2"]))
        .await
        .unwrap();
    assert_eq!(report.succeeded.len(), 2);
    assert!(report.snapshot.is_none());
}

#[tokio::test]
async fn test_provisioning_guards() {
    let coordinator = ProvisioningCoordinator::new(FakeCatalog::default());

    let err = coordinator
        .commit(&student(), drafts(&["m-1"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));

    let err = coordinator.commit(&admin(), Vec::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_remove_daily_item() {
    let coordinator = ProvisioningCoordinator::new(FakeCatalog::default());
    let report = coordinator.commit(&admin(), drafts(&["m-1"])).await.unwrap();
    let daily_id = report.succeeded[0].daily_id.clone();

    coordinator
        .remove_daily_item(&admin(), &daily_id)
        .await
        .unwrap();
    assert!(coordinator.snapshot(&admin()).await.unwrap().is_empty());

    // A second delete of the same id is an error, not a silent no-op
    let err = coordinator
        .remove_daily_item(&admin(), &daily_id)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}
