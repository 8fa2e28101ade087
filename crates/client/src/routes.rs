//! Client-side routes.
//!
//! Routes only choose what to render; nothing here blocks navigation. The
//! backend rejects what the session may not do.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use cardportal_auth::Module;
use cardportal_core::{DomainError, RoleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "route", content = "id", rename_all = "snake_case")]
pub enum Route {
    Login,
    Dashboard,
    Cards,
    CreateCard,
    Configuration,
    Countries,
    States,
    Cities,
    Companies,
    Departments,
    Designations,
    CreateRole,
    UpdateRole(RoleId),
    Roles,
    Users,
    ResetPassword,
    NotFound,
}

impl Route {
    /// Resolve a path; anything unrecognised is `NotFound`.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');
        match trimmed {
            "" => Route::Login,
            "dashboard" => Route::Dashboard,
            "card" => Route::Cards,
            "create-card" => Route::CreateCard,
            "configuration" => Route::Configuration,
            "master-data/country" => Route::Countries,
            "master-data/state" => Route::States,
            "master-data/city" => Route::Cities,
            "master-data/company" => Route::Companies,
            "master-data/department" => Route::Departments,
            "master-data/designation" => Route::Designations,
            "master-data/role-create" => Route::CreateRole,
            "roles-permissions/roles" => Route::Roles,
            "roles-permission/users-view" => Route::Users,
            "reset-password" => Route::ResetPassword,
            "404" => Route::NotFound,
            other => other
                .strip_prefix("master-data/role-update/")
                .and_then(|id| id.parse::<RoleId>().ok())
                .map_or(Route::NotFound, Route::UpdateRole),
        }
    }

    pub fn path(&self) -> String {
        let fixed = match self {
            Route::Login => "/",
            Route::Dashboard => "/dashboard",
            Route::Cards => "/card",
            Route::CreateCard => "/create-card",
            Route::Configuration => "/configuration",
            Route::Countries => "/master-data/country",
            Route::States => "/master-data/state",
            Route::Cities => "/master-data/city",
            Route::Companies => "/master-data/company",
            Route::Departments => "/master-data/department",
            Route::Designations => "/master-data/designation",
            Route::CreateRole => "/master-data/role-create",
            Route::UpdateRole(id) => return format!("/master-data/role-update/{id}"),
            Route::Roles => "/roles-permissions/roles",
            Route::Users => "/roles-permission/users-view",
            Route::ResetPassword => "/reset-password",
            Route::NotFound => "/404",
        };
        fixed.to_string()
    }

    /// Reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::ResetPassword | Route::NotFound)
    }

    /// Menu module the route belongs to, if any.
    pub fn module(&self) -> Option<Module> {
        match self {
            Route::Dashboard => Some(Module::Dashboard),
            Route::Cards | Route::CreateCard => Some(Module::Card),
            Route::Countries
            | Route::States
            | Route::Cities
            | Route::Companies
            | Route::Departments
            | Route::Designations => Some(Module::Master),
            Route::CreateRole | Route::UpdateRole(_) | Route::Roles | Route::Users => {
                Some(Module::RolesAndPermissions)
            }
            Route::Login | Route::Configuration | Route::ResetPassword | Route::NotFound => None,
        }
    }
}

impl FromStr for Route {
    type Err = DomainError;

    /// Never fails; provided so routes parse like other ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Route::parse(s))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
