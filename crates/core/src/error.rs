#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A piece of required deployment configuration is absent (for example
    /// the `default` export template). Fatal for the operation; not a
    /// per-request client error.
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(&'static str),

    #[error("Entity not found: {entity} with key {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
