use thiserror::Error;

/// Crate-wide error type.
/// Every variant carries enough context to be logged on its own.
#[derive(Debug, Error)]
pub enum StoreError {
    // ── Storage errors ───────────────────────────────────────────────────────
    #[error("Local storage is not available")]
    StorageUnavailable,

    #[error("Failed to read '{key}' from storage: {message}")]
    StorageRead { key: String, message: String },

    #[error("Failed to write '{key}' to storage: {message}")]
    StorageWrite { key: String, message: String },

    // ── Serialization errors ─────────────────────────────────────────────────
    #[error("Stored chat history under '{key}' is not valid JSON")]
    MalformedHistory {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize chat history: {0}")]
    Serialization(#[source] serde_json::Error),

    // ── Conversation errors ──────────────────────────────────────────────────
    #[error("Conversation '{id}' not found")]
    ConversationNotFound { id: String },

    // ── Validation errors ────────────────────────────────────────────────────
    #[error("Field '{field_name}' cannot be empty")]
    EmptyField { field_name: String },

    #[error("Storage key '{key}' is not a plain file name")]
    InvalidKey { key: String },

    #[error("Field '{field_name}' exceeds max length of {max_length} (actual: {actual_length})")]
    FieldTooLong { field_name: String, max_length: usize, actual_length: usize },
}

impl StoreError {
    pub fn read(key: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::StorageRead { key: key.into(), message: message.into() }
    }

    pub fn write(key: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::StorageWrite { key: key.into(), message: message.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::ConversationNotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::EmptyField { .. }
                | StoreError::FieldTooLong { .. }
                | StoreError::InvalidKey { .. }
        )
    }

    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            StoreError::StorageUnavailable
                | StoreError::StorageRead { .. }
                | StoreError::StorageWrite { .. }
        )
    }
}
