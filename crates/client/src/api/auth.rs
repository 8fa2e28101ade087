//! Login and the three-step password reset.

use cardportal_auth::SessionToken;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::{
    LoginRequest, LoginResponse, MessageResponse, OtpResponse, PasswordResetConfirm,
};

#[derive(serde::Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(serde::Serialize)]
struct OtpBody<'a> {
    email: &'a str,
    otp: &'a str,
}

impl ApiClient {
    /// `POST /login`. Does not store the token; see `PortalContext::login`.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        request.validate()?;
        self.post("/login", request).await
    }

    /// `POST /forgot-password`.
    ///
    /// A reset token in the answer replaces the stored token, so the OTP
    /// check and the final confirmation are sent with it.
    pub async fn request_password_otp(&self, email: &str) -> Result<OtpResponse, ApiError> {
        cardportal_core::Validator::new()
            .required("email", email, "Email is required")
            .email("email", email)
            .finish()?;
        let response: OtpResponse = self
            .post("/forgot-password", &EmailBody { email: email.trim() })
            .await?;
        if let Some(token) = response.token.as_deref().and_then(|raw| SessionToken::new(raw)) {
            self.tokens().set_token(token)?;
            tracing::debug!("password reset token stored");
        }
        Ok(response)
    }

    pub async fn verify_password_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> Result<MessageResponse, ApiError> {
        cardportal_core::Validator::new()
            .required("otp", otp, "OTP is required")
            .finish()?;
        self.post(
            "/verify-otp",
            &OtpBody {
                email: email.trim(),
                otp: otp.trim(),
            },
        )
        .await
    }

    pub async fn confirm_password_reset(
        &self,
        confirm: &PasswordResetConfirm,
    ) -> Result<MessageResponse, ApiError> {
        confirm.validate()?;
        self.post("/confirm-forgot-password", confirm).await
    }
}
