//! Error types

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Key column not found: {0}")]
    KeyColumnNotFound(String),

    #[error("No matching images found")]
    NoMatchingImages,
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_key_column() {
        let error = Error::KeyColumnNotFound("Stock Code".to_string());
        assert_eq!(format!("{}", error), "Key column not found: Stock Code");
    }

    #[test]
    fn test_error_display_no_data() {
        let display = format!("{}", Error::NoMatchingImages);
        assert_eq!(display, "No matching images found");
    }

    #[test]
    fn test_error_debug() {
        let error = Error::KeyColumnNotFound("SKU".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("KeyColumnNotFound"));
        assert!(debug.contains("SKU"));
    }
}
