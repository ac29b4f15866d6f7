//! Daily-menu provisioning coordinator
//!
//! Commits a batch of drafts to the catalog service one at a time.
//! Individual failures never abort the batch; the caller gets a full
//! report of what landed and what did not, plus a refreshed snapshot
//! when the service will give one.

use crate::auth;
use crate::services::Catalog;
use crate::{ClientError, ClientResult};
use shared::models::{DailyItem, ProvisioningDraft};
use shared::Session;
use tracing::{info, warn};

/// One draft that failed to commit, with its cause
#[derive(Debug)]
pub struct ProvisionFailure {
    pub draft: ProvisioningDraft,
    pub error: ClientError,
}

/// Collapsed shape of a commit, for callers that branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AllSucceeded,
    Partial,
    AllFailed,
}

/// Aggregate result of committing a draft batch
#[derive(Debug)]
pub struct ProvisionReport {
    pub succeeded: Vec<DailyItem>,
    pub failed: Vec<ProvisionFailure>,
    /// Post-commit snapshot from the catalog service; `None` when the
    /// refresh itself failed (the commit results above still stand)
    pub snapshot: Option<Vec<DailyItem>>,
}

impl ProvisionReport {
    pub fn outcome(&self) -> ProvisionOutcome {
        if self.failed.is_empty() {
            ProvisionOutcome::AllSucceeded
        } else if self.succeeded.is_empty() {
            ProvisionOutcome::AllFailed
        } else {
            ProvisionOutcome::Partial
        }
    }
}

/// Coordinates daily-menu changes against the catalog service
#[derive(Debug, Clone)]
pub struct ProvisioningCoordinator<C: Catalog> {
    catalog: C,
}

impl<C: Catalog> ProvisioningCoordinator<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Commit drafts sequentially, continuing past failures
    ///
    /// Partial outcomes are normal here: each draft is its own unit of
    /// work, and a duplicate or validation rejection on one must not
    /// cost the operator the rest of the batch.
    pub async fn commit(
        &self,
        session: &Session,
        drafts: Vec<ProvisioningDraft>,
    ) -> ClientResult<ProvisionReport> {
        auth::ensure_admin(session)?;
        if drafts.is_empty() {
            return Err(ClientError::Validation(
                "no drafts to provision".to_string(),
            ));
        }

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for draft in drafts {
            match self
                .catalog
                .create_daily_item(session, &draft.to_create())
                .await
            {
                Ok(created) => {
                    info!(
                        daily_id = %created.daily_id,
                        master_item_id = %draft.master_item_id,
                        initial_qty = draft.initial_qty,
                        "provisioned daily item"
                    );
                    succeeded.push(created);
                }
                Err(error) => {
                    warn!(
                        master_item_id = %draft.master_item_id,
                        error = %error,
                        "daily item provisioning failed"
                    );
                    failed.push(ProvisionFailure { draft, error });
                }
            }
        }

        // Server truth supersedes whatever the caller was holding,
        // whichever way the batch went
        let snapshot = match self.catalog.list_daily_items(session).await {
            Ok(items) => Some(items),
            Err(error) => {
                warn!(error = %error, "post-commit snapshot refresh failed");
                None
            }
        };

        Ok(ProvisionReport {
            succeeded,
            failed,
            snapshot,
        })
    }

    /// Remove a persisted daily entry. Irreversible; the entry's sales
    /// history goes with it.
    pub async fn remove_daily_item(&self, session: &Session, daily_id: &str) -> ClientResult<()> {
        auth::ensure_admin(session)?;
        self.catalog.delete_daily_item(session, daily_id).await?;
        info!(daily_id = %daily_id, "removed daily item");
        Ok(())
    }

    /// Fetch the current daily snapshot
    pub async fn snapshot(&self, session: &Session) -> ClientResult<Vec<DailyItem>> {
        auth::ensure_active(session)?;
        self.catalog.list_daily_items(session).await
    }

    /// Fetch the master catalog
    pub async fn master_catalog(
        &self,
        session: &Session,
    ) -> ClientResult<Vec<shared::models::MasterItem>> {
        auth::ensure_active(session)?;
        self.catalog.list_master_items(session).await
    }
}
