//! Error types shared by storage, service, and HTTP layers.

use std::fmt;
use thiserror::Error;

/// Message attached to a required field that was left blank.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// One unmet form constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every unmet constraint of a submitted form, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a single error.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Names of the failing fields, without duplicates.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::with_capacity(self.errors.len());
        for e in &self.errors {
            if !fields.contains(&e.field) {
                fields.push(e.field);
            }
        }
        fields
    }

    /// Messages attached to `field`.
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid fields: {}", self.fields().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Domain-level failure of a café operation.
#[derive(Debug, Error)]
pub enum CafeError {
    #[error("a cafe named '{name}' already exists")]
    Conflict { name: String },

    #[error("no cafe with id {0}")]
    NotFound(i64),

    #[error("there are no cafes yet")]
    EmptyCollection,

    #[error("deletion key rejected")]
    Authorization,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
