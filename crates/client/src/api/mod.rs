//! Typed REST bindings, one module per area of the portal.
//!
//! Each binding is a thin `impl ApiClient` method: build the path, send, map
//! the body. Validation that the forms perform before submitting lives on the
//! payload types and runs here, so an invalid form never reaches the wire.

mod access;
mod auth;
mod cards;
mod dashboard;
mod masters;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use cardportal_core::{DomainError, ListQuery, Page};

use crate::error::ApiError;
use crate::http::ApiClient;

/// The paged list endpoints, by resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListResource {
    Cards,
    Companies,
    Departments,
    Designations,
    Countries,
    States,
    Cities,
    Users,
    Roles,
}

impl ListResource {
    pub const ALL: [ListResource; 9] = [
        ListResource::Cards,
        ListResource::Companies,
        ListResource::Departments,
        ListResource::Designations,
        ListResource::Countries,
        ListResource::States,
        ListResource::Cities,
        ListResource::Users,
        ListResource::Roles,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ListResource::Cards => "/employees/list",
            ListResource::Companies => "/companies",
            ListResource::Departments => "/departments",
            ListResource::Designations => "/designations",
            ListResource::Countries => "/countries",
            ListResource::States => "/states",
            ListResource::Cities => "/cities",
            ListResource::Users => "/users",
            ListResource::Roles => "/roles",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListResource::Cards => "cards",
            ListResource::Companies => "companies",
            ListResource::Departments => "departments",
            ListResource::Designations => "designations",
            ListResource::Countries => "countries",
            ListResource::States => "states",
            ListResource::Cities => "cities",
            ListResource::Users => "users",
            ListResource::Roles => "roles",
        }
    }
}

impl fmt::Display for ListResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListResource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListResource::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation(format!("unknown resource: {s}")))
    }
}

impl ApiClient {
    /// `GET {path}?start=&limit=&search=` returning `{data, count}`.
    pub async fn list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
    ) -> Result<Page<T>, ApiError> {
        self.get_query(path, &query.params()).await
    }
}
