//! Permissions, modules, roles and portal users.

use cardportal_auth::{ModuleSummary, PermissionSet, RoleDetail, RolePayload};
use cardportal_core::{ListQuery, Page, RoleId, UserId};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::{DataResponse, MessageResponse, PortalUser, RoleSummary, UserPayload};

#[derive(serde::Serialize)]
struct RoleName<'a> {
    name: &'a str,
}

impl ApiClient {
    /// `GET /permission`: the current user's grants.
    pub async fn permissions(&self) -> Result<PermissionSet, ApiError> {
        let body: DataResponse<PermissionSet> = self.get("/permission").await?;
        Ok(body.data)
    }

    /// `GET /modules`: every module a role can be granted.
    pub async fn modules(&self) -> Result<Vec<ModuleSummary>, ApiError> {
        let body: DataResponse<Vec<ModuleSummary>> = self.get("/modules").await?;
        Ok(body.data)
    }

    pub async fn roles(&self, query: &ListQuery) -> Result<Page<RoleSummary>, ApiError> {
        self.list_page("/roles", query).await
    }

    /// `GET /roles/{id}` answers with the role itself, unwrapped.
    pub async fn role(&self, id: RoleId) -> Result<RoleDetail, ApiError> {
        self.get(&format!("/roles/{id}")).await
    }

    pub async fn create_role(&self, payload: &RolePayload) -> Result<MessageResponse, ApiError> {
        self.post("/roles", payload).await
    }

    pub async fn update_role(
        &self,
        id: RoleId,
        payload: &RolePayload,
    ) -> Result<MessageResponse, ApiError> {
        self.put(&format!("/roles/{id}"), payload).await
    }

    /// Rename only, as the roles table does.
    pub async fn rename_role(&self, id: RoleId, name: &str) -> Result<MessageResponse, ApiError> {
        cardportal_core::Validator::new()
            .required("name", name, "Role name required")
            .finish()?;
        self.put(&format!("/roles/{id}"), &RoleName { name: name.trim() })
            .await
    }

    pub async fn delete_role(&self, id: RoleId) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("/roles/{id}")).await
    }

    pub async fn users(&self, query: &ListQuery) -> Result<Page<PortalUser>, ApiError> {
        self.list_page("/users", query).await
    }

    pub async fn create_user(&self, payload: &UserPayload) -> Result<MessageResponse, ApiError> {
        if payload.password.is_none() {
            return Err(cardportal_core::DomainError::validation("Password is required").into());
        }
        payload.validate()?;
        self.post("/users", payload).await
    }

    /// `PUT /users/{id}`; any password on the payload is dropped.
    pub async fn update_user(
        &self,
        id: UserId,
        payload: &UserPayload,
    ) -> Result<MessageResponse, ApiError> {
        let payload = UserPayload {
            password: None,
            ..payload.clone()
        };
        payload.validate()?;
        self.put(&format!("/users/{id}"), &payload).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("/users/{id}")).await
    }
}
