//! Error types for the event store.

/// Errors that can occur during event store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database operation failed.
    #[error("event store database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization or deserialization failed.
    #[error("event store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored payload decoded to something other than a JSON object.
    #[error("event {id} has a payload that is not a JSON object")]
    CorruptPayload {
        /// The id of the offending row.
        id: i64,
    },
}
