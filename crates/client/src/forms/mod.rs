//! Form view-models for creating, updating and deleting customers.
//!
//! Each form owns its edit state and a handle to the [`CollectionStore`]. The
//! store is only touched after the remote service confirms a write, so a failed
//! submit leaves both the store and the buffer as they were.
//!
//! [`CollectionStore`]: crate::store::CollectionStore

mod buffer;
mod create;
mod delete;
mod error;
mod update;

pub use buffer::{CustomerDraft, FIELD_NAMES};
pub use create::CreateForm;
pub use delete::DeleteForm;
pub use error::{FormError, ValidationError};
pub use update::UpdateForm;

/// Lifecycle of a form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    /// Accepting edits.
    #[default]
    Editing,
    /// A request is in flight.
    Submitting,
    /// The last submit succeeded.
    Done(String),
    /// The last submit failed.
    Failed(String),
}

impl FormStatus {
    /// Message to show next to the form, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Done(message) | Self::Failed(message) => Some(message),
            Self::Editing | Self::Submitting => None,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
