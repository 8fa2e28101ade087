//! `cardportal-auth`: session credentials and the permission model.
//!
//! This crate is decoupled from HTTP: it knows how permissions are shaped,
//! how they turn into a menu and how the role editor edits them, but not how
//! they are fetched.

pub mod authorize;
pub mod module;
pub mod navigation;
pub mod permissions;
pub mod role_editor;
pub mod token;

pub use authorize::{AuthzError, authorize};
pub use module::Module;
pub use navigation::{Icon, NavItem, NavState, NavTarget, build_nav};
pub use permissions::{Action, PermissionEntry, PermissionFlags, PermissionSet, PermissionState};
pub use role_editor::{
    FlagBits, ModulePermissionPayload, ModulePermissionRow, ModuleSummary, RoleDetail, RoleDraft,
    RoleModulePermission, RolePayload,
};
pub use token::{FileTokenStore, MemoryTokenStore, SessionToken, TokenError, TokenStore};
