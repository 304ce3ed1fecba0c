//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No council members configured")]
    NoMembers,

    #[error("Empty prompt")]
    EmptyPrompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::NoMembers.to_string(),
            "No council members configured"
        );
    }
}
