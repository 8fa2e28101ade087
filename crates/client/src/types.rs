//! Wire types for the portal's REST resources.
//!
//! Response types are lenient (missing fields default) because the backend
//! omits nested objects freely. Payload types are exactly what the endpoints
//! accept.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use cardportal_core::{
    AddressId, CityId, CompanyId, CountryId, DepartmentId, DesignationId, DomainResult, EmployeeId,
    RoleId, SortValue, Sortable, StateId, UserId, Validator,
};

/// `{ "message": ... }` returned by every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// `{ "data": ... }` wrapper used by unpaged reads. A missing `data` is
/// read as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default)]
    pub data: T,
}

/// A nested `{ "name": ... }` reference (company, department, role...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: String,
}

fn nested_name(value: &Option<NamedRef>) -> SortValue {
    SortValue::optional_text(value.as_ref().map(|r| r.name.as_str()))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        Validator::new()
            .required("email", &self.email, "Email is required")
            .email("email", &self.email)
            .required("password", &self.password, "Password is required")
            .finish()
    }
}

/// Login response: the bearer token plus whatever profile the backend sends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

/// Answer to `POST /forgot-password`; some backends return a reset token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtpResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl PasswordResetConfirm {
    pub fn validate(&self) -> DomainResult<()> {
        Validator::new()
            .required("email", &self.email, "Email is required")
            .required("password", &self.password, "Password is required")
            .matches(
                "confirm_password",
                &self.confirm_password,
                &self.password,
                "Passwords must match",
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Users and roles
// ---------------------------------------------------------------------------

const SUPER_ADMIN: &str = "Super Admin";

/// Row of `GET /roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub id: RoleId,
    pub name: String,
}

impl Sortable for RoleSummary {
    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(self.name.clone()),
            "id" => SortValue::number(self.id.get() as f64),
            _ => SortValue::Missing,
        }
    }
}

/// Row of `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalUser {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role_id: Option<RoleId>,
    #[serde(default)]
    pub role: Option<NamedRef>,
}

impl PortalUser {
    /// Super admins are listed but cannot be edited from the portal.
    pub fn is_super_admin(&self) -> bool {
        self.role.as_ref().is_some_and(|r| r.name == SUPER_ADMIN)
    }
}

impl Sortable for PortalUser {
    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(self.name.clone()),
            "email" => SortValue::text(self.email.clone()),
            "role.name" => nested_name(&self.role),
            _ => SortValue::Missing,
        }
    }
}

/// Body of `POST /users` (with password) and `PUT /users/{id}` (without).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role_id: Option<RoleId>,
}

impl UserPayload {
    pub fn validate(&self) -> DomainResult<()> {
        let mut v = Validator::new()
            .selected("role_id", self.role_id, "Role name required")
            .required("name", &self.name, "User name required")
            .required("email", &self.email, "Email is required")
            .email("email", &self.email);
        if let Some(password) = &self.password {
            v = v.required("password", password, "Password is required");
        }
        v.finish()
    }
}

// ---------------------------------------------------------------------------
// Master data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyAddress {
    #[serde(default)]
    pub id: Option<AddressId>,
    #[serde(default)]
    pub country_id: Option<CountryId>,
    #[serde(default)]
    pub state_id: Option<StateId>,
    #[serde(default)]
    pub city_id: Option<CityId>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub city: Option<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub addresses: Vec<CompanyAddress>,
}

impl Sortable for Company {
    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(self.name.clone()),
            "url" => SortValue::optional_text(self.url.as_deref()),
            "addresses.city" => nested_name(&self.addresses.first().and_then(|a| a.city.clone())),
            _ => SortValue::Missing,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPayload {
    pub country_id: Option<CountryId>,
    pub state_id: Option<StateId>,
    pub city_id: Option<CityId>,
    pub street: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyPayload {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub addresses: Vec<AddressPayload>,
}

impl CompanyPayload {
    pub fn validate(&self) -> DomainResult<()> {
        Validator::new()
            .required("name", &self.name, "Company name required")
            .required("url", &self.url, "Company URL required")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub company: Option<NamedRef>,
}

impl Sortable for Department {
    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(self.name.clone()),
            "company.name" => nested_name(&self.company),
            _ => SortValue::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentPayload {
    pub name: String,
    pub company_id: Option<CompanyId>,
}

impl DepartmentPayload {
    pub fn validate(&self) -> DomainResult<()> {
        Validator::new()
            .selected("company_id", self.company_id, "Company name required")
            .required("name", &self.name, "Department name required")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designation {
    pub id: DesignationId,
    pub name: String,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub department: Option<NamedRef>,
}

impl Sortable for Designation {
    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(self.name.clone()),
            "department.name" => nested_name(&self.department),
            _ => SortValue::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignationPayload {
    pub name: String,
    pub department_id: Option<DepartmentId>,
}

impl DesignationPayload {
    pub fn validate(&self) -> DomainResult<()> {
        Validator::new()
            .selected("department_id", self.department_id, "Department name required")
            .required("name", &self.name, "Designation name required")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
    #[serde(default)]
    pub country_id: Option<CountryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
    #[serde(default)]
    pub state_id: Option<StateId>,
}

macro_rules! by_name {
    ($($t:ty),*) => {
        $(
            impl Sortable for $t {
                fn sort_value(&self, column: &str) -> SortValue {
                    match column {
                        "name" => SortValue::text(self.name.clone()),
                        _ => SortValue::Missing,
                    }
                }
            }
        )*
    };
}

by_name!(Country, State, City);

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// An employee's business card (row of `GET /employees/list`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub designation_id: Option<DesignationId>,
    #[serde(default)]
    pub company_address_id: Option<AddressId>,
    #[serde(default)]
    pub company: Option<NamedRef>,
    #[serde(default)]
    pub department: Option<NamedRef>,
    #[serde(default)]
    pub designation: Option<NamedRef>,
    #[serde(default, rename = "qrcodeUrl", alias = "qrcode_url")]
    pub qrcode_url: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Payload to resubmit this card with edits applied by the caller.
    pub fn to_payload(&self) -> EmployeePayload {
        EmployeePayload {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company_id: self.company_id,
            department_id: self.department_id,
            designation_id: self.designation_id,
            company_address_id: self.company_address_id,
        }
    }
}

impl Sortable for Employee {
    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "name" => SortValue::text(self.full_name()),
            "company" => nested_name(&self.company),
            "department" => nested_name(&self.department),
            "designation" => nested_name(&self.designation),
            "phone" => SortValue::text(self.phone.clone()),
            "email" => SortValue::text(self.email.clone()),
            _ => SortValue::Missing,
        }
    }
}

/// Columns of the card table that never sort.
pub const CARD_UNSORTABLE_COLUMNS: [&str; 5] = ["view", "send", "delete", "qrcodeUrl", "update"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company_id: Option<CompanyId>,
    pub department_id: Option<DepartmentId>,
    pub designation_id: Option<DesignationId>,
    pub company_address_id: Option<AddressId>,
}

impl EmployeePayload {
    /// Every field is mandatory; the first failure reads "All fields are required".
    pub fn validate(&self) -> DomainResult<()> {
        const ALL: &str = "All fields are required";
        Validator::new()
            .required("first_name", &self.first_name, ALL)
            .required("last_name", &self.last_name, ALL)
            .required("email", &self.email, ALL)
            .required("phone", &self.phone, ALL)
            .selected("company_id", self.company_id, ALL)
            .selected("department_id", self.department_id, ALL)
            .selected("designation_id", self.designation_id, ALL)
            .selected("company_address_id", self.company_address_id, ALL)
            .email("email", &self.email)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScanAddress {
    #[serde(default)]
    pub city: Option<String>,
}

/// One scan of a card's QR code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanEntry {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub sr: Option<u64>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub address: ScanAddress,
}

impl ScanEntry {
    /// `created_at` as UTC; accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS`.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScanLog {
    #[serde(default)]
    pub scan_count: u64,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub device_info: Vec<ScanEntry>,
}

/// `GET /employees/scan-logs/{id}` answers `{ data: [ScanLog] }`; only the
/// first element is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScanLogResponse {
    #[serde(default)]
    pub data: Vec<ScanLog>,
}

impl ScanLogResponse {
    pub fn into_log(self) -> ScanLog {
        self.data.into_iter().next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFile {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendByPhone {
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendByEmail {
    pub email: String,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    #[serde(default)]
    pub total_cards: u64,
    #[serde(default)]
    pub download_qr_count: u64,
    #[serde(default)]
    pub scan_qr_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use cardportal_core::{SortKey, filter_by_name, sort_rows};

    #[test]
    fn lookups_sort_and_filter_by_name() {
        let mut countries: Vec<Country> = serde_json::from_value(json!([
            { "id": 1, "name": "India" },
            { "id": 2, "name": "Austria" },
            { "id": 3, "name": "Indonesia" },
        ]))
        .unwrap();

        sort_rows(&mut countries, &[SortKey::desc("name")]);
        let names: Vec<_> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Indonesia", "India", "Austria"]);

        let hits = filter_by_name(countries, "IND");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn employee_reads_list_row() {
        let row: Employee = serde_json::from_value(json!({
            "id": 7,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "phone": "555",
            "company": { "name": "Analytical" },
            "qrcodeUrl": "https://cdn/qr/7.jpg"
        }))
        .unwrap();
        assert_eq!(row.full_name(), "Ada Lovelace");
        assert_eq!(row.display_name(), "Ada Lovelace");
        assert_eq!(row.qrcode_url.as_deref(), Some("https://cdn/qr/7.jpg"));
        assert_eq!(row.sort_value("company"), SortValue::text("Analytical"));
        assert_eq!(row.sort_value("department"), SortValue::Missing);
    }

    #[test]
    fn employee_payload_requires_everything() {
        let err = EmployeePayload {
            first_name: "Ada".into(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.user_message(), "All fields are required");
    }

    #[test]
    fn company_payload_messages() {
        let payload = CompanyPayload {
            name: "Acme".into(),
            url: " ".into(),
            addresses: vec![],
        };
        assert_eq!(
            payload.validate().unwrap_err().user_message(),
            "Company URL required"
        );
    }

    #[test]
    fn user_update_omits_password() {
        let payload = UserPayload {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            password: None,
            role_id: Some(RoleId::new(2)),
        };
        assert!(payload.validate().is_ok());
        let body = serde_json::to_value(&payload).unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["role_id"], 2);
    }

    #[test]
    fn super_admin_detection() {
        let user: PortalUser = serde_json::from_value(json!({
            "id": 1, "name": "root", "email": "root@example.com",
            "role": { "name": "Super Admin" }
        }))
        .unwrap();
        assert!(user.is_super_admin());
    }

    #[test]
    fn scan_log_takes_first_element() {
        let resp: ScanLogResponse = serde_json::from_value(json!({
            "data": [{
                "scan_count": 3,
                "download_count": 1,
                "device_info": [{
                    "id": 1,
                    "ip_address": "10.0.0.1",
                    "created_at": "2024-03-05 14:30:00",
                    "address": { "city": "Pune" }
                }]
            }]
        }))
        .unwrap();
        let log = resp.into_log();
        assert_eq!(log.scan_count, 3);
        let entry = &log.device_info[0];
        assert_eq!(entry.address.city.as_deref(), Some("Pune"));
        let ts = entry.timestamp().unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2024, 3, 5, 14));
    }

    #[test]
    fn empty_scan_log_is_zeroed() {
        let resp: ScanLogResponse = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert_eq!(resp.into_log(), ScanLog::default());
    }

    #[test]
    fn reset_confirmation_must_match() {
        let confirm = PasswordResetConfirm {
            email: "a@b.co".into(),
            password: "one".into(),
            confirm_password: "two".into(),
        };
        assert_eq!(
            confirm.validate().unwrap_err().user_message(),
            "Passwords must match"
        );
    }
}
