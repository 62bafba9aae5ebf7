//! Recoverable errors reported while loading data or moving the sequence

use thiserror::Error;

/// Errors surfaced to the user; none of them is fatal and the controller's
/// state is left untouched when one is returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Invalid JSON: {0}")]
    Parse(String),

    #[error("No data to parse")]
    EmptyInput,

    #[error("No array of records found in document")]
    NoArrayFound,

    #[error("Index {index} out of range (total: {total})")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("Invalid embedded configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_parser_message() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let message = json_error.to_string();
        let error: LoadError = json_error.into();
        assert!(matches!(error, LoadError::Parse(_)));
        assert!(error.to_string().contains(&message));
    }

    #[test]
    fn test_index_out_of_range_display() {
        let error = LoadError::IndexOutOfRange { index: 5, total: 5 };
        assert_eq!(error.to_string(), "Index 5 out of range (total: 5)");
    }

    #[test]
    fn test_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let error: LoadError = io_error.into();
        assert!(matches!(error, LoadError::Io(_)));
        assert!(error.to_string().contains("missing.json"));
    }
}
