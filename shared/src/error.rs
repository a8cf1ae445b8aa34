//! Error types shared by the gateway, the session controller and the
//! frontend adapters.

use thiserror::Error;

use crate::gateway::WriteOperation;

/// A form that cannot be written yet. Blocks the write before any request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Nama kambing wajib diisi")]
    MissingName,
    #[error("Tanggal tidak valid untuk {field}: {value}")]
    InvalidDate { field: &'static str, value: String },
}

/// Failure reported by the remote record store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store answered with an error; the message is the store's own text
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(String),
    /// The signed-in session expired and could not be renewed; no request was sent
    #[error("Session expired: {0}")]
    SessionExpired(String),
    #[error("Failed to serialize request: {0}")]
    Encode(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Failure reported by the auth provider.
///
/// `Rejected` carries the provider's message verbatim, it is shown as-is on the
/// login form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to serialize request: {0}")]
    Encode(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to persist session: {0}")]
    Storage(String),
}

/// Why a save or delete did not go through
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{} Error: {source}", .operation.label())]
    Write {
        operation: WriteOperation,
        source: StoreError,
    },
    #[error("No form is open")]
    FormClosed,
}

impl GatewayError {
    pub fn write(operation: WriteOperation, source: StoreError) -> Self {
        GatewayError::Write { operation, source }
    }
}
