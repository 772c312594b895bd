//! Error types shared across the Vicinity workspace.
//!
//! Configuration and phase errors live with the crates that raise them;
//! this module holds the host-boundary errors that every layer sees.

use std::error::Error;
use std::fmt;

use crate::id::ObjectId;

/// Failure to read privileged per-object state from the host.
///
/// Returned by [`WorldView::interpolated_transform`](crate::WorldView::interpolated_transform).
/// Always recoverable: the descriptor builder omits the affected
/// attributes and carries on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// The host build does not expose the requested state.
    FieldNotFound {
        /// Name of the missing field or accessor.
        field: String,
    },
    /// The host refused access to the requested state.
    AccessDenied {
        /// Description of the refusal.
        reason: String,
    },
    /// The object is not (or is no longer) a remote observer.
    NotRemoteObserver {
        /// The object that was queried.
        object: ObjectId,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldNotFound { field } => write!(f, "field '{field}' not found"),
            Self::AccessDenied { reason } => write!(f, "access denied: {reason}"),
            Self::NotRemoteObserver { object } => {
                write!(f, "object {object} is not a remote observer")
            }
        }
    }
}

impl Error for AccessError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_field() {
        let e = AccessError::FieldNotFound {
            field: "interp_x".into(),
        };
        assert_eq!(e.to_string(), "field 'interp_x' not found");
    }

    #[test]
    fn display_names_the_object() {
        let e = AccessError::NotRemoteObserver {
            object: ObjectId(12),
        };
        assert_eq!(e.to_string(), "object 12 is not a remote observer");
    }
}
