//! Error types for Spaceport core.

use thiserror::Error;

/// Error type for ship operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShipError {
    /// The request was malformed or a field violated its bounds.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// No ship exists with the given identifier.
    #[error("ship {0} not found")]
    NotFound(i64),
    /// The backing store failed.
    #[error("store error: {0}")]
    Store(String),
}

impl ShipError {
    /// Build a [`ShipError::BadRequest`] from any message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Wrap a store failure.
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }
}

/// Convenience result type for Spaceport core.
pub type Result<T> = std::result::Result<T, ShipError>;

#[cfg(test)]
mod tests {
    use super::ShipError;

    #[test]
    fn bad_request_formats_message() {
        let error = ShipError::bad_request("speed out of range");
        assert_eq!(format!("{error}"), "bad request: speed out of range");
    }

    #[test]
    fn not_found_formats_id() {
        assert_eq!(format!("{}", ShipError::NotFound(42)), "ship 42 not found");
    }

    #[test]
    fn store_wraps_display() {
        let error = ShipError::store(std::io::Error::other("connection refused"));
        assert_eq!(error, ShipError::Store("connection refused".to_string()));
    }
}
