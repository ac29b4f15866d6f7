//! Catalog service interface

use super::{expect_data, expect_ok};
use crate::http::HttpApi;
use crate::ClientResult;
use async_trait::async_trait;
use shared::error::ApiResponse;
use shared::models::{DailyItem, DailyItemCreate, MasterItem};
use shared::Session;

/// Catalog capability: master items and the daily snapshot
///
/// Every call authenticates as the passed session; implementations
/// forward its bearer token.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_master_items(&self, session: &Session) -> ClientResult<Vec<MasterItem>>;

    async fn list_daily_items(&self, session: &Session) -> ClientResult<Vec<DailyItem>>;

    /// Create one daily entry; the service assigns the surrogate id
    async fn create_daily_item(
        &self,
        session: &Session,
        create: &DailyItemCreate,
    ) -> ClientResult<DailyItem>;

    /// Irreversible removal of a persisted daily entry
    async fn delete_daily_item(&self, session: &Session, daily_id: &str) -> ClientResult<()>;
}

/// HTTP-backed catalog service
#[derive(Debug, Clone)]
pub struct HttpCatalog<H: HttpApi> {
    http: H,
}

impl<H: HttpApi> HttpCatalog<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<H: HttpApi> Catalog for HttpCatalog<H> {
    async fn list_master_items(&self, session: &Session) -> ClientResult<Vec<MasterItem>> {
        let resp: ApiResponse<Vec<MasterItem>> = self
            .http
            .get("api/items/master", Some(&session.token))
            .await?;
        expect_data(resp, "master items")
    }

    async fn list_daily_items(&self, session: &Session) -> ClientResult<Vec<DailyItem>> {
        let resp: ApiResponse<Vec<DailyItem>> = self
            .http
            .get("api/items/daily", Some(&session.token))
            .await?;
        expect_data(resp, "daily items")
    }

    async fn create_daily_item(
        &self,
        session: &Session,
        create: &DailyItemCreate,
    ) -> ClientResult<DailyItem> {
        let resp: ApiResponse<DailyItem> = self
            .http
            .post("api/items/daily", Some(&session.token), create)
            .await?;
        expect_data(resp, "daily item")
    }

    async fn delete_daily_item(&self, session: &Session, daily_id: &str) -> ClientResult<()> {
        let resp: ApiResponse<()> = self
            .http
            .delete(
                &format!("api/items/daily/{}", daily_id),
                Some(&session.token),
            )
            .await?;
        expect_ok(resp, "daily item delete")
    }
}
