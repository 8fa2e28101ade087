//! The session's permission list, observable.
//!
//! Holds the latest `PermissionState` behind a `watch` channel so any number
//! of views can react to refreshes. Refreshes are sequenced: only the most
//! recently issued fetch may write, and a failed fetch writes nothing.

use std::sync::Arc;

use tokio::sync::watch;

use cardportal_auth::{NavState, PermissionState};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::sequence::RequestSequencer;

#[derive(Debug)]
pub struct PermissionStore {
    tx: watch::Sender<Arc<PermissionState>>,
    seq: RequestSequencer,
}

impl Default for PermissionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionStore {
    /// Starts in `Loading`: nothing fetched yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(PermissionState::Loading));
        Self {
            tx,
            seq: RequestSequencer::new(),
        }
    }

    pub fn current(&self) -> Arc<PermissionState> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<PermissionState>> {
        self.tx.subscribe()
    }

    pub fn navigation(&self) -> NavState {
        NavState::from(self.current().as_ref())
    }

    /// Fetch `GET /permission` and replace the stored state.
    ///
    /// On failure the previous state stays in place and the error is returned
    /// (already logged). A response overtaken by a newer refresh is dropped
    /// and the current state returned.
    pub async fn update_permissions(
        &self,
        client: &ApiClient,
    ) -> Result<Arc<PermissionState>, ApiError> {
        let ticket = self.seq.issue();
        let result = client.permissions().await;

        if !self.seq.is_latest(ticket) {
            tracing::debug!(ticket = ticket.get(), "discarding superseded permission response");
            return Ok(self.current());
        }

        match result {
            Ok(set) => {
                tracing::info!(modules = set.len(), "permissions refreshed");
                let unknown = set.unknown_names();
                if !unknown.is_empty() {
                    tracing::warn!(?unknown, "permission entries for unknown modules");
                }
                let state = Arc::new(PermissionState::from_set(set));
                self.tx.send_replace(state.clone());
                Ok(state)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch permissions");
                Err(err)
            }
        }
    }

    /// Forget everything (logout).
    pub fn reset(&self) {
        // Outstanding fetches must not repopulate a logged-out session.
        self.seq.issue();
        self.tx.send_replace(Arc::new(PermissionState::Loading));
    }
}
