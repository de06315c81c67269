//! Errors raised by the form view-models.

use thiserror::Error;

use crate::api::ApiError;

/// Local field checks that failed before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("First name is required")]
    MissingFirstName,

    #[error("Last name is required")]
    MissingLastName,

    #[error("At least one phone is required")]
    NoPhones,

    /// Phone at `index` (0-based) lacks its area code or number.
    #[error("Phone {} needs both an area code and a number", .index + 1)]
    IncompletePhone { index: usize },
}

/// Errors returned by form operations.
#[derive(Debug, Clone, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("No phone at index {index} (form has {len})")]
    PhoneIndex { index: usize, len: usize },

    #[error("No form is open")]
    NotOpen,
}

impl FormError {
    /// Whether the error was raised locally, without a network call.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        !matches!(self, Self::Api(_))
    }
}
