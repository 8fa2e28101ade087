//! In-page action gating.
//!
//! The menu is gated per module; buttons (create, edit, delete) are gated per
//! action. The backend stays the authority: a passed check only means the
//! action is offered.

use thiserror::Error;

use crate::{Action, Module, PermissionState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("permissions have not been loaded yet")]
    NotLoaded,

    #[error("forbidden: missing '{action}' on module '{module}'")]
    Forbidden { module: Module, action: Action },
}

/// Check that the session may perform `action` within `module`.
///
/// - No IO
/// - No panics
pub fn authorize(state: &PermissionState, module: Module, action: Action) -> Result<(), AuthzError> {
    if state.is_loading() {
        return Err(AuthzError::NotLoaded);
    }
    if state.allows(module, action) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden { module, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PermissionEntry, PermissionFlags, PermissionSet};

    fn state(flags: PermissionFlags) -> PermissionState {
        PermissionState::from_set(PermissionSet::from_entries([PermissionEntry::new(
            "Master", flags,
        )]))
    }

    #[test]
    fn granted_action_passes() {
        let s = state(PermissionFlags {
            read: true,
            create: true,
            ..Default::default()
        });
        assert_eq!(authorize(&s, Module::Master, Action::Create), Ok(()));
    }

    #[test]
    fn missing_action_is_forbidden() {
        let s = state(PermissionFlags {
            nav_view: true,
            read: true,
            ..Default::default()
        });
        let err = authorize(&s, Module::Master, Action::Delete).unwrap_err();
        assert_eq!(
            err.to_string(),
            "forbidden: missing 'delete' on module 'Master'"
        );
        assert!(authorize(&s, Module::Card, Action::Read).is_err());
    }

    #[test]
    fn loading_state_is_reported_separately() {
        assert_eq!(
            authorize(&PermissionState::Loading, Module::Card, Action::Read),
            Err(AuthzError::NotLoaded)
        );
    }
}
