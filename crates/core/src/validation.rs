//! Pre-submit form validation.
//!
//! Checks run in declaration order; the first failure is what the user sees
//! as a notice, the full list backs inline field errors.

use serde::Serialize;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Blank (or whitespace-only) values fail with `message`.
    pub fn required(mut self, field: &'static str, value: &str, message: &str) -> Self {
        if value.trim().is_empty() {
            self.push(field, message);
        }
        self
    }

    /// `None` fails with `message`; used for dropdown selections.
    pub fn selected<T>(mut self, field: &'static str, value: Option<T>, message: &str) -> Self {
        if value.is_none() {
            self.push(field, message);
        }
        self
    }

    /// Email format check. Blank values are left to `required`.
    pub fn email(mut self, field: &'static str, value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() && !is_email(value) {
            self.push(field, "Invalid email format");
        }
        self
    }

    pub fn matches(mut self, field: &'static str, value: &str, other: &str, message: &str) -> Self {
        if value != other {
            self.push(field, message);
        }
        self
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collapse into a result carrying the first failure.
    pub fn finish(self) -> DomainResult<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(DomainError::validation(first.message)),
        }
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
