use thiserror::Error;

/// Input rejection reasons, checked in declaration order before any write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name cannot be empty.")]
    EmptyName,
    #[error("Name must contain only letters and spaces.")]
    InvalidNameChars,
    #[error("Choose a valid gender.")]
    InvalidGender,
    #[error("Comment must be at least 10 characters.")]
    CommentTooShort,
}

impl ValidationError {
    pub fn code(self) -> &'static str {
        match self {
            ValidationError::EmptyName => "empty_name",
            ValidationError::InvalidNameChars => "invalid_name_chars",
            ValidationError::InvalidGender => "invalid_gender",
            ValidationError::CommentTooShort => "comment_too_short",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// The database file or connection could not be reached.
    Unavailable,
    /// The schema could not be created or checked.
    Schema,
    /// The engine rejected a statement.
    Query,
    /// A stored row does not map onto a complaint.
    Decode,
}

#[derive(Debug, Clone, Error)]
#[error("{kind:?} storage failure: {message}")]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ComplaintError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ComplaintError {
    pub fn as_validation(&self) -> Option<ValidationError> {
        match self {
            ComplaintError::Validation(err) => Some(*err),
            ComplaintError::Storage(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_failed_rule() {
        assert_eq!(ValidationError::EmptyName.to_string(), "Name cannot be empty.");
        assert_eq!(
            ValidationError::CommentTooShort.to_string(),
            "Comment must be at least 10 characters."
        );
        assert_eq!(ValidationError::InvalidGender.code(), "invalid_gender");
    }

    #[test]
    fn complaint_error_keeps_the_underlying_kind() {
        let err = ComplaintError::from(ValidationError::InvalidNameChars);
        assert_eq!(err.as_validation(), Some(ValidationError::InvalidNameChars));
        assert_eq!(
            err.to_string(),
            "Name must contain only letters and spaces."
        );

        let err = ComplaintError::from(StorageError::new(StorageErrorKind::Unavailable, "disk full"));
        assert!(err.as_validation().is_none());
        assert_eq!(err.to_string(), "Unavailable storage failure: disk full");
    }
}
