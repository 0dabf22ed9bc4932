use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// A value read back from the database is not one the application writes.
    ///
    /// Occurs when a stored enum column (role, status, kind...) holds a string the
    /// domain model does not recognise. Results in a 500 Internal Server Error with a
    /// generic message returned to client.
    #[error("Invalid stored value '{value}' for {field}")]
    InvalidStoredValue {
        /// Table and column the value came from
        field: &'static str,
        /// The raw stored value
        value: String,
    },

    /// Password hashing failed.
    ///
    /// Argon2 only fails on misconfigured parameters, so this indicates a bug rather
    /// than bad user input.
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    /// The chat-completion API answered with something that is not an insight list.
    ///
    /// Never reaches a client: the insight service falls back to its fixed rules.
    #[error("Unusable completion response: {0}")]
    CompletionResponse(String),

    /// Failure to serialize audit details or other JSON payloads.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}
