//! Business cards (employees) and their QR code side channels.

use cardportal_core::{EmployeeId, ListQuery, Page, Validator};

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::{
    Employee, EmployeePayload, MessageResponse, SampleFile, ScanLog, ScanLogResponse,
    SendByEmail, SendByPhone,
};

impl ApiClient {
    pub async fn cards(&self, query: &ListQuery) -> Result<Page<Employee>, ApiError> {
        self.list_page("/employees/list", query).await
    }

    pub async fn create_card(&self, payload: &EmployeePayload) -> Result<MessageResponse, ApiError> {
        payload.validate()?;
        self.post("/employees", payload).await
    }

    pub async fn update_card(
        &self,
        id: EmployeeId,
        payload: &EmployeePayload,
    ) -> Result<MessageResponse, ApiError> {
        payload.validate()?;
        self.put(&format!("/employees/{id}"), payload).await
    }

    pub async fn delete_card(&self, id: EmployeeId) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("/employees/{id}")).await
    }

    /// Scan history; an employee never scanned yields a zeroed log.
    pub async fn scan_log(&self, id: EmployeeId) -> Result<ScanLog, ApiError> {
        let resp: ScanLogResponse = self.get(&format!("/employees/scan-logs/{id}")).await?;
        Ok(resp.into_log())
    }

    /// Record that the card's QR image was downloaded.
    pub async fn record_qr_download(&self, id: EmployeeId) -> Result<MessageResponse, ApiError> {
        self.get(&format!("/employees/download-qr-count/{id}")).await
    }

    pub async fn send_qr_sms(&self, phone: &str) -> Result<MessageResponse, ApiError> {
        Validator::new()
            .required("phone", phone, "Phone number is required")
            .finish()?;
        self.post(
            "/employees/send-qr-code",
            &SendByPhone {
                phone: phone.trim().to_string(),
            },
        )
        .await
    }

    pub async fn send_qr_email(&self, email: &str) -> Result<MessageResponse, ApiError> {
        Validator::new()
            .required("email", email, "Email is required")
            .email("email", email)
            .finish()?;
        self.post(
            "/employees/email/send-qr-code",
            &SendByEmail {
                email: email.trim().to_string(),
            },
        )
        .await
    }

    /// Link to the bulk-upload template.
    pub async fn sample_file(&self) -> Result<SampleFile, ApiError> {
        self.get("/employees/download-sample-file").await
    }
}
