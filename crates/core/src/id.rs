//! Strongly-typed identifiers for backend records.
//!
//! The backend assigns numeric ids; each record kind gets its own newtype so
//! a department id cannot be passed where a company id is expected.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! record_id {
    ($($(#[$doc:meta])* $t:ident => $name:literal;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $t(u64);

            impl $t {
                pub const fn new(raw: u64) -> Self {
                    Self(raw)
                }

                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl core::fmt::Display for $t {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    core::fmt::Display::fmt(&self.0, f)
                }
            }

            impl From<u64> for $t {
                fn from(value: u64) -> Self {
                    Self(value)
                }
            }

            impl From<$t> for u64 {
                fn from(value: $t) -> Self {
                    value.0
                }
            }

            impl FromStr for $t {
                type Err = DomainError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let raw = s
                        .trim()
                        .parse::<u64>()
                        .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                    Ok(Self(raw))
                }
            }
        )*
    };
}

record_id! {
    /// Identifier of a permission module ("Dashboard", "Card", ...).
    ModuleId => "ModuleId";
    /// Identifier of a role.
    RoleId => "RoleId";
    /// Identifier of a portal (admin) user.
    UserId => "UserId";
    CompanyId => "CompanyId";
    /// Identifier of one of a company's addresses.
    AddressId => "AddressId";
    DepartmentId => "DepartmentId";
    DesignationId => "DesignationId";
    CountryId => "CountryId";
    StateId => "StateId";
    CityId => "CityId";
    /// Identifier of an employee card record.
    EmployeeId => "EmployeeId";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_numeric_ids() {
        let id: RoleId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric_ids_with_type_name() {
        let err = "abc".parse::<CompanyId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("CompanyId")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&EmployeeId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: EmployeeId = serde_json::from_str("7").unwrap();
        assert_eq!(back, EmployeeId::new(7));
    }
}
