use thiserror::Error;

/// Top-level error type for the Krishi system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define their
/// own error types and implement `From<SubsystemError> for KrishiError` so
/// that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KrishiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for KrishiError {
    fn from(err: toml::de::Error) -> Self {
        KrishiError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for KrishiError {
    fn from(err: toml::ser::Error) -> Self {
        KrishiError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for KrishiError {
    fn from(err: serde_json::Error) -> Self {
        KrishiError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Krishi operations.
pub type Result<T> = std::result::Result<T, KrishiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KrishiError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(KrishiError, &str)> = vec![
            (
                KrishiError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                KrishiError::Model("weights missing".to_string()),
                "Model error: weights missing",
            ),
            (
                KrishiError::Chat("session gone".to_string()),
                "Chat error: session gone",
            ),
            (
                KrishiError::Api("unauthorized".to_string()),
                "API error: unauthorized",
            ),
            (
                KrishiError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let krishi_err: KrishiError = io_err.into();
        assert!(matches!(krishi_err, KrishiError::Io(_)));
        assert!(krishi_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_io_error_display_includes_prefix() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let krishi_err: KrishiError = io_err.into();
        let display = krishi_err.to_string();
        assert!(display.starts_with("I/O error:"));
        assert!(display.contains("access denied"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let err: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(err.is_err());
        let krishi_err: KrishiError = err.unwrap_err().into();
        assert!(matches!(krishi_err, KrishiError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        assert!(err.is_err());
        let krishi_err: KrishiError = err.unwrap_err().into();
        assert!(matches!(krishi_err, KrishiError::Serialization(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(KrishiError::Config("fail".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }

    #[test]
    fn test_error_debug_impl() {
        let err = KrishiError::Model("test debug".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Model"));
        assert!(debug_str.contains("test debug"));
    }
}
