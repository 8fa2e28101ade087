//! `cardportal-core`: shared building blocks for the card portal client.
//!
//! Pure data and helpers only: identifiers, the domain error model, list
//! pagination, table sorting/filtering and form validation. No IO.

pub mod error;
pub mod id;
pub mod paging;
pub mod table;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use id::{
    AddressId, CityId, CompanyId, CountryId, DepartmentId, DesignationId, EmployeeId, ModuleId,
    RoleId, StateId, UserId,
};
pub use paging::{ListQuery, Page, Pager};
pub use table::{
    SortDirection, SortKey, SortState, SortValue, Sortable, TableView, filter_by_name, sort_rows,
};
pub use validation::{FieldError, Validator};
