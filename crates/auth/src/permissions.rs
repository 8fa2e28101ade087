//! Per-module permission entries as served by `GET /permission`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::Module;

/// A capability that a permission entry can grant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    NavView,
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::NavView,
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::NavView => "nav_view",
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Granting this action implies `Read`.
    pub fn implies_read(self) -> bool {
        matches!(
            self,
            Action::NavView | Action::Create | Action::Update | Action::Delete
        )
    }
}

impl core::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five flags of one module.
///
/// The backend mixes JSON booleans and `0`/`1` integers; both are accepted.
/// Role detail responses spell the CRUD flags `createP`, `readP`, ...
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionFlags {
    #[serde(default, deserialize_with = "flag")]
    pub nav_view: bool,
    #[serde(default, alias = "createP", deserialize_with = "flag")]
    pub create: bool,
    #[serde(default, alias = "readP", deserialize_with = "flag")]
    pub read: bool,
    #[serde(default, alias = "updateP", deserialize_with = "flag")]
    pub update: bool,
    #[serde(default, alias = "deleteP", deserialize_with = "flag")]
    pub delete: bool,
}

impl PermissionFlags {
    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::NavView => self.nav_view,
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    /// Raw assignment without the read implication (see `RoleDraft`).
    pub fn put(&mut self, action: Action, value: bool) {
        match action {
            Action::NavView => self.nav_view = value,
            Action::Create => self.create = value,
            Action::Read => self.read = value,
            Action::Update => self.update = value,
            Action::Delete => self.delete = value,
        }
    }

    pub fn granted(&self) -> Vec<Action> {
        Action::ALL.into_iter().filter(|a| self.get(*a)).collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Option::<RawFlag>::deserialize(deserializer)?;
    Ok(match raw {
        None => false,
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Int(n)) => n != 0,
        Some(RawFlag::Text(s)) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
    })
}

/// One module's permissions for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub name: String,
    #[serde(flatten)]
    pub flags: PermissionFlags,
}

impl PermissionEntry {
    pub fn new(name: impl Into<String>, flags: PermissionFlags) -> Self {
        Self {
            name: name.into(),
            flags,
        }
    }

    /// The typed module, if the name is one the portal knows.
    pub fn module(&self) -> Option<Module> {
        Module::from_name(&self.name)
    }
}

/// Permission entries keyed uniquely by module name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet {
    entries: Vec<PermissionEntry>,
}

impl PermissionSet {
    /// Build a set, keeping the first entry for a repeated name.
    pub fn from_entries(entries: impl IntoIterator<Item = PermissionEntry>) -> Self {
        let mut kept: Vec<PermissionEntry> = Vec::new();
        for entry in entries {
            if kept.iter().any(|e| e.name == entry.name) {
                tracing::warn!(module = %entry.name, "duplicate permission entry ignored");
                continue;
            }
            kept.push(entry);
        }
        Self { entries: kept }
    }

    pub fn entries(&self) -> &[PermissionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&PermissionEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn module(&self, module: Module) -> Option<&PermissionEntry> {
        self.get(module.name())
    }

    pub fn allows(&self, module: Module, action: Action) -> bool {
        self.module(module).is_some_and(|e| e.flags.get(action))
    }

    /// Names the backend sent that the portal does not recognise.
    pub fn unknown_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.module().is_none())
            .map(|e| e.name.as_str())
            .collect()
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Option::<Vec<PermissionEntry>>::deserialize(deserializer)?;
        Ok(Self::from_entries(entries.unwrap_or_default()))
    }
}

/// Load state of the session's permissions.
///
/// `Loading` (never fetched) and `Empty` (fetched, nothing granted) are kept
/// apart so a caller can show a spinner instead of "no access".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PermissionState {
    #[default]
    Loading,
    Empty,
    Loaded(PermissionSet),
}

impl PermissionState {
    pub fn from_set(set: PermissionSet) -> Self {
        if set.is_empty() {
            Self::Empty
        } else {
            Self::Loaded(set)
        }
    }

    pub fn set(&self) -> Option<&PermissionSet> {
        match self {
            Self::Loaded(set) => Some(set),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn allows(&self, module: Module, action: Action) -> bool {
        self.set().is_some_and(|s| s.allows(module, action))
    }
}
