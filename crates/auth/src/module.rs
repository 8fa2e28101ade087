//! Known permission modules.
//!
//! The backend scopes permissions by module *name*. Only the names listed
//! here can ever reach the menu; anything else the backend sends is ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Module {
    #[serde(rename = "Dashboard")]
    Dashboard,
    #[serde(rename = "Card")]
    Card,
    #[serde(rename = "Master")]
    Master,
    #[serde(rename = "Roles and permissions")]
    RolesAndPermissions,
}

impl Module {
    /// Menu order, independent of the order permissions arrive in.
    pub const ORDER: [Module; 4] = [
        Module::Dashboard,
        Module::Card,
        Module::Master,
        Module::RolesAndPermissions,
    ];

    /// Backend module name (exact, case-sensitive).
    pub fn name(self) -> &'static str {
        match self {
            Module::Dashboard => "Dashboard",
            Module::Card => "Card",
            Module::Master => "Master",
            Module::RolesAndPermissions => "Roles and permissions",
        }
    }

    /// Exact-match lookup; no trimming or case folding.
    pub fn from_name(name: &str) -> Option<Module> {
        Self::ORDER.into_iter().find(|m| m.name() == name)
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
