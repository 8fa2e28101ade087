//! Role create/update editor.
//!
//! Both screens share one shape: a role name plus one row of flags per
//! module. Turning on `nav_view`, `create`, `update` or `delete` also turns
//! on `read`; nothing ever turns `read` off implicitly.

use serde::{Deserialize, Serialize};

use cardportal_core::{DomainError, DomainResult, ModuleId, RoleId, Validator};

use crate::{Action, PermissionFlags};

/// A module as listed by `GET /modules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub id: ModuleId,
    pub name: String,
}

/// One module association of an existing role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleModulePermission {
    pub module: ModuleSummary,
    #[serde(flatten)]
    pub flags: PermissionFlags,
}

/// Role as returned by `GET /roles/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDetail {
    #[serde(default)]
    pub id: Option<RoleId>,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<RoleModulePermission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePermissionRow {
    pub module_id: ModuleId,
    pub module_name: String,
    pub flags: PermissionFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RoleDraft {
    name: String,
    rows: Vec<ModulePermissionRow>,
}

impl RoleDraft {
    /// Create screen: every module, every flag off.
    pub fn for_modules(modules: &[ModuleSummary]) -> Self {
        Self {
            name: String::new(),
            rows: modules
                .iter()
                .map(|m| ModulePermissionRow {
                    module_id: m.id,
                    module_name: m.name.clone(),
                    flags: PermissionFlags::default(),
                })
                .collect(),
        }
    }

    /// Update screen: rows keyed by the role's existing module associations.
    pub fn from_role(role: RoleDetail) -> Self {
        Self {
            name: role.name,
            rows: role
                .permissions
                .into_iter()
                .map(|p| ModulePermissionRow {
                    module_id: p.module.id,
                    module_name: p.module.name,
                    flags: p.flags,
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn rows(&self) -> &[ModulePermissionRow] {
        &self.rows
    }

    /// Row index of a module by exact name.
    pub fn position(&self, module_name: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.module_name == module_name)
    }

    fn row_mut(&mut self, row: usize) -> DomainResult<&mut ModulePermissionRow> {
        let len = self.rows.len();
        self.rows
            .get_mut(row)
            .ok_or_else(|| DomainError::invariant(format!("row {row} out of range ({len} modules)")))
    }

    /// Flip one flag (a switch click). Returns the new value.
    pub fn toggle(&mut self, row: usize, action: Action) -> DomainResult<bool> {
        let current = self.row_mut(row)?.flags.get(action);
        self.set(row, action, !current)?;
        Ok(!current)
    }

    /// Set one flag, applying the read implication when turning it on.
    pub fn set(&mut self, row: usize, action: Action, value: bool) -> DomainResult<()> {
        let flags = &mut self.row_mut(row)?.flags;
        flags.put(action, value);
        if value && action.implies_read() {
            flags.read = true;
        }
        Ok(())
    }

    /// Request body for `POST /roles` / `PUT /roles/{id}`.
    pub fn payload(&self) -> DomainResult<RolePayload> {
        Validator::new()
            .required("name", &self.name, "Role name required")
            .finish()?;

        Ok(RolePayload {
            name: self.name.trim().to_string(),
            module_permissions: self
                .rows
                .iter()
                .map(|r| ModulePermissionPayload {
                    module_id: r.module_id,
                    permissions: FlagBits::from(r.flags),
                })
                .collect(),
        })
    }
}

/// Flags encoded as `0`/`1`, the shape the role endpoints expect.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagBits {
    pub nav_view: u8,
    pub read: u8,
    pub create: u8,
    pub update: u8,
    pub delete: u8,
}

impl From<PermissionFlags> for FlagBits {
    fn from(f: PermissionFlags) -> Self {
        Self {
            nav_view: u8::from(f.nav_view),
            read: u8::from(f.read),
            create: u8::from(f.create),
            update: u8::from(f.update),
            delete: u8::from(f.delete),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePermissionPayload {
    pub module_id: ModuleId,
    pub permissions: FlagBits,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePayload {
    pub name: String,
    pub module_permissions: Vec<ModulePermissionPayload>,
}
