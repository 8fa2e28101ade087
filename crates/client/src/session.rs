//! Explicit session context.
//!
//! `PortalContext` owns the shared handles (API client, token store,
//! permission store) and is passed to whoever needs them; there is no global
//! state. `Session` is an immutable snapshot of what the user currently holds.

use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

use cardportal_auth::{
    Action, AuthzError, FileTokenStore, MemoryTokenStore, Module, NavState, PermissionState,
    SessionToken, TokenStore, authorize,
};
use cardportal_core::DomainError;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::permission_store::PermissionStore;
use crate::types::{LoginRequest, LoginResponse};

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Option<SessionToken>,
    pub permissions: Arc<PermissionState>,
    /// Profile fields from the login answer; `None` until this context logs in.
    pub profile: Option<Arc<Map<String, Value>>>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn navigation(&self) -> NavState {
        NavState::from(self.permissions.as_ref())
    }

    /// Whether to offer `action` inside `module` (buttons, forms).
    pub fn authorize(&self, module: Module, action: Action) -> Result<(), AuthzError> {
        authorize(&self.permissions, module, action)
    }

    pub fn offered_actions(&self, module: Module) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| self.authorize(module, *action).is_ok())
            .collect()
    }
}

#[derive(Debug)]
pub struct PortalContext {
    client: ApiClient,
    permissions: PermissionStore,
    profile: RwLock<Option<Arc<Map<String, Value>>>>,
}

impl PortalContext {
    /// Context backed by the durable token store.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let store: Arc<dyn TokenStore> = match &config.token_path {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(FileTokenStore::new(FileTokenStore::default_path()?)),
        };
        Ok(Self::new(ApiClient::new(config, store)?))
    }

    /// In-memory context; nothing survives the process.
    pub fn ephemeral(config: &ClientConfig) -> Result<Self, ApiError> {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        Ok(Self::new(ApiClient::new(config, store)?))
    }

    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            permissions: PermissionStore::new(),
            profile: RwLock::new(None),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn permissions(&self) -> &PermissionStore {
        &self.permissions
    }

    pub fn snapshot(&self) -> Arc<Session> {
        Arc::new(Session {
            token: self.client.tokens().token(),
            permissions: self.permissions.current(),
            profile: self.profile(),
        })
    }

    pub fn profile(&self) -> Option<Arc<Map<String, Value>>> {
        self.profile
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_profile(&self, profile: Option<Arc<Map<String, Value>>>) {
        *self
            .profile
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = profile;
    }

    /// Log in, store the token, then load permissions.
    ///
    /// A failed permission load does not fail the login; the snapshot simply
    /// still reads `Loading`.
    pub async fn login(&self, request: &LoginRequest) -> Result<Arc<Session>, ApiError> {
        let response: LoginResponse = self.client.login(request).await?;
        let token = response
            .token
            .as_deref()
            .and_then(|raw| SessionToken::new(raw))
            .ok_or_else(|| ApiError::Rejected {
                message: response
                    .message
                    .clone()
                    .unwrap_or_else(|| "Login response carried no token".to_string()),
            })?;
        self.client.tokens().set_token(token)?;
        self.set_profile(Some(Arc::new(response.profile)));
        tracing::info!(email = %request.email, "logged in");
        Ok(self.refresh().await)
    }

    /// Re-fetch permissions and return the resulting snapshot.
    pub async fn refresh(&self) -> Arc<Session> {
        if self.client.tokens().token().is_none() {
            tracing::debug!("no session token; skipping permission refresh");
            return self.snapshot();
        }
        // Failures are logged by the store and leave the old state.
        let _ = self.permissions.update_permissions(&self.client).await;
        self.snapshot()
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.client.tokens().clear()?;
        self.permissions.reset();
        self.set_profile(None);
        tracing::info!("logged out");
        Ok(())
    }

    /// Fails with `Unauthorized` when no token is stored.
    pub fn require_token(&self) -> Result<SessionToken, ApiError> {
        self.client
            .tokens()
            .token()
            .ok_or_else(|| ApiError::Domain(DomainError::Unauthorized))
    }
}
