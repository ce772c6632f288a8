use thiserror::Error;

/// Domain-level errors raised when a write candidate cannot become a stored record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Transaction {0} has no client reference")]
    MissingClientReference(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            DomainError::MissingClientReference("tx-9".to_string()).to_string(),
            "Transaction tx-9 has no client reference"
        );
        assert_eq!(
            DomainError::InvalidAmount("12a".to_string()).to_string(),
            "Invalid amount: 12a"
        );
        assert_eq!(
            DomainError::InvalidDate("yesterday".to_string()).to_string(),
            "Invalid date: yesterday"
        );
    }

    #[test]
    fn error_is_cloneable() {
        let err = DomainError::InvalidAmount("x".to_string());
        assert_eq!(err.clone(), err);
    }
}
