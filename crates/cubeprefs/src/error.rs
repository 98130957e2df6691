use thiserror::Error;

/// Error produced when loading, saving, or validating attributes.
#[derive(Error, Debug)]
pub enum PrefsError {
    /// Error building or deserializing the layered configuration
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    /// Error serializing or parsing YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),
    /// Error reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Attribute with a value out of range
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Name of the attribute.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
