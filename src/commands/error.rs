use crate::stations::AddStreamError;

/// Command failures. `Display` is the chat reply; silent errors render nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Never shown to the caller
    #[error("permission denied")]
    PermissionDenied,
    #[error("{usage}")]
    MissingArgument { usage: &'static str },
    /// Non-numeric id given to `approvestream`
    #[error("Invalid stream index provided, got {given}")]
    InvalidIndex { given: String },
    #[error("Stream not found at index {given}")]
    IndexNotFound { given: String },
    /// Non-numeric id given to `removestream`
    #[error("Invalid stream ID provided, got {given}")]
    InvalidId { given: String },
    #[error("Stream with ID {id} not found")]
    NotFound { id: String },
    /// Record is outside the caller's removal scope; worded like `NotFound`
    #[error("Stream with ID {id} not found")]
    NotOwner { id: String },
    #[error("Invalid limit provided, got {given} (must be a positive integer)")]
    InvalidQuotaValue { given: String },
    #[error(transparent)]
    Add(#[from] AddStreamError),
}

impl CommandError {
    /// Errors that produce no reply at all
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            CommandError::PermissionDenied | CommandError::Add(AddStreamError::PermissionDenied)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_owner_reads_as_not_found() {
        let not_owner = CommandError::NotOwner { id: "3".to_string() };
        let not_found = CommandError::NotFound { id: "3".to_string() };
        assert_eq!(not_owner.to_string(), not_found.to_string());
        assert_ne!(not_owner, not_found);
    }

    #[test]
    fn test_silent_errors() {
        assert!(CommandError::PermissionDenied.is_silent());
        assert!(CommandError::from(AddStreamError::PermissionDenied).is_silent());
        assert!(!CommandError::from(AddStreamError::QuotaExceeded { limit: 3 }).is_silent());
    }

    #[test]
    fn test_add_errors_pass_through() {
        let err = CommandError::from(AddStreamError::NameTooLong { length: 40 });
        assert_eq!(err.to_string(), "Stream name must be <= 32 characters, got 40");
    }
}
