use thiserror::Error;

/// Error type for configuration loading and saving.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JarvisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for JarvisError {
    fn from(err: toml::de::Error) -> Self {
        JarvisError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for JarvisError {
    fn from(err: toml::ser::Error) -> Self {
        JarvisError::Config(err.to_string())
    }
}

/// A specialized `Result` type for assistant operations.
pub type Result<T> = std::result::Result<T, JarvisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JarvisError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: JarvisError = io_err.into();
        assert!(matches!(err, JarvisError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse_err = toml::from_str::<toml::Value>("not = {{ valid").unwrap_err();
        let err: JarvisError = parse_err.into();
        assert!(matches!(err, JarvisError::Config(_)));
    }

    #[test]
    fn test_toml_ser_error_conversion() {
        // TOML table keys must be strings.
        let map = std::collections::BTreeMap::from([(1u8, 1u8)]);
        let ser_err = toml::to_string(&map).unwrap_err();
        let err: JarvisError = ser_err.into();
        assert!(matches!(err, JarvisError::Config(_)));
    }
}
