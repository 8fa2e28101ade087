//! Permission-driven navigation menu.
//!
//! The menu is derived, never stored: rebuild it whenever the permission
//! state changes.

use serde::Serialize;

use crate::{Module, PermissionEntry, PermissionSet, PermissionState};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Analytics,
    List,
    Widgets,
    ManageAccounts,
    Dot,
}

/// Where a menu item leads: a route (leaf) or a submenu (group), never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NavTarget {
    Link { path: &'static str },
    Group { children: Vec<NavItem> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub icon: Icon,
    #[serde(flatten)]
    pub target: NavTarget,
}

impl NavItem {
    fn link(title: &'static str, icon: Icon, path: &'static str) -> Self {
        Self {
            title,
            icon,
            target: NavTarget::Link { path },
        }
    }

    fn group(title: &'static str, icon: Icon, children: Vec<NavItem>) -> Self {
        Self {
            title,
            icon,
            target: NavTarget::Group { children },
        }
    }

    pub fn path(&self) -> Option<&'static str> {
        match self.target {
            NavTarget::Link { path } => Some(path),
            NavTarget::Group { .. } => None,
        }
    }

    pub fn children(&self) -> &[NavItem] {
        match &self.target {
            NavTarget::Link { .. } => &[],
            NavTarget::Group { children } => children,
        }
    }

    /// Every route reachable from this item, depth first.
    pub fn paths(&self) -> Vec<&'static str> {
        match &self.target {
            NavTarget::Link { path } => vec![*path],
            NavTarget::Group { children } => children.iter().flat_map(NavItem::paths).collect(),
        }
    }
}

impl Module {
    /// The static menu fragment shown when the module is granted.
    pub fn menu(self) -> NavItem {
        match self {
            Module::Dashboard => NavItem::link("Dashboard", Icon::Analytics, "/dashboard"),
            Module::Card => NavItem::link("Card", Icon::List, "/card"),
            Module::Master => NavItem::group(
                "Master Data",
                Icon::Widgets,
                vec![
                    NavItem::link("Company", Icon::Dot, "/master-data/company"),
                    NavItem::link("Department", Icon::Dot, "/master-data/department"),
                    NavItem::link("Designation", Icon::Dot, "/master-data/designation"),
                    NavItem::link("Country", Icon::Dot, "/master-data/country"),
                    NavItem::link("State", Icon::Dot, "/master-data/state"),
                    NavItem::link("City", Icon::Dot, "/master-data/city"),
                ],
            ),
            Module::RolesAndPermissions => NavItem::group(
                "Roles and Permissions",
                Icon::ManageAccounts,
                vec![
                    NavItem::link("Roles", Icon::Dot, "/roles-permissions/roles"),
                    NavItem::link("Users", Icon::Dot, "/roles-permission/users-view"),
                ],
            ),
        }
    }
}

/// Build the menu from the user's permission entries.
///
/// Modules appear in `Module::ORDER`; a module is present exactly when an
/// entry with its name is. Granularity is the module: a group's children are
/// always emitted whole. Entries with unknown names are dropped.
pub fn build_nav(permissions: &[PermissionEntry]) -> Vec<NavItem> {
    if permissions.is_empty() {
        return Vec::new();
    }
    Module::ORDER
        .into_iter()
        .filter(|module| permissions.iter().any(|e| e.name == module.name()))
        .map(Module::menu)
        .collect()
}

impl PermissionSet {
    pub fn navigation(&self) -> Vec<NavItem> {
        build_nav(self.entries())
    }
}

/// What the navigation pane should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum NavState {
    Loading,
    NoAccess,
    Menu(Vec<NavItem>),
}

impl From<&PermissionState> for NavState {
    fn from(state: &PermissionState) -> Self {
        match state {
            PermissionState::Loading => NavState::Loading,
            PermissionState::Empty => NavState::NoAccess,
            PermissionState::Loaded(set) => {
                let items = set.navigation();
                if items.is_empty() {
                    NavState::NoAccess
                } else {
                    NavState::Menu(items)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PermissionFlags;
    use proptest::prelude::*;

    fn visible(name: &str) -> PermissionEntry {
        PermissionEntry::new(
            name,
            PermissionFlags {
                nav_view: true,
                ..Default::default()
            },
        )
    }

    fn titles(items: &[NavItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.title).collect()
    }

    #[test]
    fn empty_permissions_build_empty_menu() {
        assert!(build_nav(&[]).is_empty());
        let set: PermissionSet = serde_json::from_str("null").unwrap();
        assert!(set.navigation().is_empty());
    }

    #[test]
    fn dashboard_and_card_only() {
        let nav = build_nav(&[visible("Dashboard"), visible("Card")]);
        assert_eq!(nav, vec![Module::Dashboard.menu(), Module::Card.menu()]);
        assert_eq!(nav[0].path(), Some("/dashboard"));
        assert_eq!(nav[1].path(), Some("/card"));
    }

    #[test]
    fn canonical_order_regardless_of_input_order() {
        let nav = build_nav(&[
            visible("Roles and permissions"),
            visible("Card"),
            visible("Master"),
            visible("Dashboard"),
        ]);
        assert_eq!(
            titles(&nav),
            vec!["Dashboard", "Card", "Master Data", "Roles and Permissions"]
        );
    }

    #[test]
    fn master_group_emits_every_child() {
        let nav = build_nav(&[visible("Master")]);
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[0].path(), None);
        assert_eq!(
            nav[0].paths(),
            vec![
                "/master-data/company",
                "/master-data/department",
                "/master-data/designation",
                "/master-data/country",
                "/master-data/state",
                "/master-data/city",
            ]
        );
    }

    #[test]
    fn unknown_and_miscased_names_are_dropped() {
        let nav = build_nav(&[visible("Reports"), visible("card"), visible("Dashboard")]);
        assert_eq!(titles(&nav), vec!["Dashboard"]);
    }

    #[test]
    fn serializes_leaf_and_group_shapes() {
        let json = serde_json::to_value(build_nav(&[visible("Card"), visible("Roles and permissions")]))
            .unwrap();
        assert_eq!(
            json[0],
            serde_json::json!({"title": "Card", "icon": "list", "path": "/card"})
        );
        assert!(json[1].get("path").is_none());
        assert_eq!(json[1]["children"][1]["path"], "/roles-permission/users-view");
    }

    #[test]
    fn nav_state_follows_permission_state() {
        assert_eq!(NavState::from(&PermissionState::Loading), NavState::Loading);
        assert_eq!(NavState::from(&PermissionState::Empty), NavState::NoAccess);

        let only_unknown = PermissionState::from_set(PermissionSet::from_entries([visible("Reports")]));
        assert_eq!(NavState::from(&only_unknown), NavState::NoAccess);

        let card = PermissionState::from_set(PermissionSet::from_entries([visible("Card")]));
        assert_eq!(NavState::from(&card), NavState::Menu(vec![Module::Card.menu()]));
    }

    fn any_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("Dashboard".to_string()),
            Just("Card".to_string()),
            Just("Master".to_string()),
            Just("Roles and permissions".to_string()),
            "[A-Za-z ]{1,12}",
        ]
    }

    proptest! {
        #[test]
        fn menu_is_ordered_filtered_and_whitelisted(names in prop::collection::vec(any_name(), 0..10)) {
            let entries: Vec<PermissionEntry> = names.iter().map(|n| visible(n)).collect();
            let nav = build_nav(&entries);

            let expected: Vec<NavItem> = Module::ORDER
                .into_iter()
                .filter(|m| names.iter().any(|n| n == m.name()))
                .map(Module::menu)
                .collect();
            prop_assert_eq!(&nav, &expected);

            let allowed: Vec<&str> = Module::ORDER.iter().map(|m| m.menu().title).collect();
            for item in &nav {
                prop_assert!(allowed.contains(&item.title));
            }
        }
    }
}
