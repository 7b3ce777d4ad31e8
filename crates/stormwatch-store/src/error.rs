/// Errors from the external rule store.
///
/// Any of these is fatal to a batch run: if the rule set cannot be loaded
/// there is nothing to evaluate, and the caller gets a 500.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Non-2xx response from the rule store.
    #[error("rule store returned an error: status={status}, body={body}")]
    Http { status: u16, body: String },

    /// The store's response body could not be decoded into alert rows.
    #[error("rule store response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// Underlying HTTP transport error from `reqwest`.
    #[error("rule store unreachable: {0}")]
    Network(#[from] reqwest::Error),
}

/// Convenience `Result` alias for rule store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
