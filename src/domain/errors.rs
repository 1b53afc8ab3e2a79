//! Errors surfaced by record store round-trips.

use thiserror::Error;

/// Failure of a record store operation.
///
/// `InvalidRecord` is a store-layer schema rejection (the document violates a
/// structural constraint, e.g. a time marker that is not exactly two
/// elements). `Database` covers every other upstream failure. Neither is ever
/// allowed to escape a command handler as a raw failure; the hub converts
/// both into error events for the requesting connection.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Creates a database error from any displayable cause.
    pub fn database(cause: impl std::fmt::Display) -> Self {
        StoreError::Database(cause.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_error_displays_cause() {
        let err = StoreError::database("connection refused");
        assert_eq!(format!("{}", err), "database error: connection refused");
    }

    #[test]
    fn invalid_record_displays_reason() {
        let err = StoreError::InvalidRecord("horario must have 2 elements".into());
        assert_eq!(
            format!("{}", err),
            "invalid record: horario must have 2 elements"
        );
    }
}
