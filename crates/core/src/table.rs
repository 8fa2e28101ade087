//! Client-side table ordering and filtering.
//!
//! Tables hold one server page at a time; the header lets the user reorder
//! that page by column and narrow it by name without a round trip.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Column value used for ordering.
///
/// Ordering is total: `Missing < Number < Text`. Text compares
/// case-insensitively first and falls back to the exact text.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Number(f64),
    Text(String),
}

impl SortValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn number(value: impl Into<f64>) -> Self {
        Self::Number(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, Self::text)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// A row that can be ordered by named columns.
pub trait Sortable {
    /// Value of `column` for this row; unknown columns are `Missing`.
    fn sort_value(&self, column: &str) -> SortValue;

    /// Text matched by the name filter.
    fn display_name(&self) -> String {
        match self.sort_value("name") {
            SortValue::Text(name) => name,
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// One column of a multi-column ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Stable multi-column sort.
///
/// Keys are applied left to right; rows equal on every key keep their
/// original relative order.
pub fn sort_rows<T: Sortable>(rows: &mut [T], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        keys.iter()
            .map(|key| {
                key.direction
                    .apply(a.sort_value(&key.column).compare(&b.sort_value(&key.column)))
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

/// Keep rows whose display name contains `needle` (case-insensitive).
pub fn filter_by_name<T: Sortable>(rows: Vec<T>, needle: &str) -> Vec<T> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| row.display_name().to_lowercase().contains(&needle))
        .collect()
}

/// Header sort state for a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    column: String,
    direction: SortDirection,
    fixed: Vec<String>,
}

impl SortState {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
            fixed: Vec::new(),
        }
    }

    /// Columns that ignore header clicks (action columns such as "delete").
    pub fn with_unsortable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixed = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Handle a header click on `column`.
    ///
    /// Clicking the active ascending column flips it to descending; any other
    /// click sorts ascending by that column. Returns `false` for unsortable
    /// columns, which leave the state untouched.
    pub fn request(&mut self, column: &str) -> bool {
        if self.fixed.iter().any(|c| c == column) {
            return false;
        }
        let was_asc = self.column == column && self.direction == SortDirection::Asc;
        self.direction = if was_asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.column = column.to_string();
        true
    }

    pub fn key(&self) -> SortKey {
        SortKey {
            column: self.column.clone(),
            direction: self.direction,
        }
    }
}

/// Rows ready for display plus the "No records are found" flag.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView<T> {
    pub rows: Vec<T>,
    pub not_found: bool,
}

impl<T: Sortable> TableView<T> {
    /// Sort by the header state, then apply the name filter.
    pub fn build(mut rows: Vec<T>, sort: &SortState, filter: &str) -> Self {
        sort_rows(&mut rows, &[sort.key()]);
        let filtering = !filter.trim().is_empty();
        let rows = filter_by_name(rows, filter);
        let not_found = rows.is_empty() && filtering;
        Self { rows, not_found }
    }
}
