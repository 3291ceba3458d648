use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the entire portfel-core library.
/// Every fallible operation returns `Result<T, CoreError>`.
///
/// The set of kinds is closed: every consumer (the HTTP layer above all)
/// matches exhaustively to decide status codes and which messages are
/// safe to show. Expected failure modes are values of this type, never
/// panics.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Auth ────────────────────────────────────────────────────────
    #[error("User is not authenticated")]
    Unauthenticated,

    #[error("Not authorized to access {resource}")]
    Unauthorized { resource: String },

    // ── Lookup / input ──────────────────────────────────────────────
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    // ── Configuration ───────────────────────────────────────────────
    #[error("Missing configuration: {key}")]
    Config { key: String },

    // ── External API ────────────────────────────────────────────────
    #[error("{service} API error: {message}")]
    Api {
        service: String,
        status: Option<u16>,
        message: String,
    },

    // ── Persistence ─────────────────────────────────────────────────
    #[error("Database {operation} failed: {message}")]
    Database { operation: String, message: String },
}

impl CoreError {
    /// Validation failure without a specific field.
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Validation failure attached to a named input field.
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: impl std::fmt::Display) -> Self {
        CoreError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn database(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        CoreError::Database {
            operation: operation.into(),
            message: cause.to_string(),
        }
    }
}

/// Wire-safe mirror of [`CoreError`] for crossing a process boundary.
///
/// Carries the tag and the structured fields that are safe to show the
/// caller; never an underlying cause, stack, or connection detail. The
/// mapping to and from [`CoreError`] is total, so a result serialized on
/// one side reconstructs into the same failure kind on the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag")]
pub enum SerializedError {
    Unauthenticated,
    Unauthorized {
        resource: String,
    },
    NotFound {
        resource: String,
        id: String,
    },
    Validation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        message: String,
    },
    Config {
        key: String,
    },
    Api {
        service: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        message: String,
    },
    Database {
        operation: String,
        message: String,
    },
}

impl SerializedError {
    /// The human-readable message for this error, as [`CoreError`] would
    /// display it.
    pub fn message(&self) -> String {
        CoreError::from(self.clone()).to_string()
    }
}

impl std::fmt::Display for SerializedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<&CoreError> for SerializedError {
    fn from(error: &CoreError) -> Self {
        match error {
            CoreError::Unauthenticated => SerializedError::Unauthenticated,
            CoreError::Unauthorized { resource } => SerializedError::Unauthorized {
                resource: resource.clone(),
            },
            CoreError::NotFound { resource, id } => SerializedError::NotFound {
                resource: resource.clone(),
                id: id.clone(),
            },
            CoreError::Validation { field, message } => SerializedError::Validation {
                field: field.clone(),
                message: message.clone(),
            },
            CoreError::Config { key } => SerializedError::Config { key: key.clone() },
            CoreError::Api {
                service,
                status,
                message,
            } => SerializedError::Api {
                service: service.clone(),
                status: *status,
                message: message.clone(),
            },
            CoreError::Database { operation, message } => SerializedError::Database {
                operation: operation.clone(),
                message: message.clone(),
            },
        }
    }
}

impl From<SerializedError> for CoreError {
    fn from(error: SerializedError) -> Self {
        match error {
            SerializedError::Unauthenticated => CoreError::Unauthenticated,
            SerializedError::Unauthorized { resource } => CoreError::Unauthorized { resource },
            SerializedError::NotFound { resource, id } => CoreError::NotFound { resource, id },
            SerializedError::Validation { field, message } => {
                CoreError::Validation { field, message }
            }
            SerializedError::Config { key } => CoreError::Config { key },
            SerializedError::Api {
                service,
                status,
                message,
            } => CoreError::Api {
                service,
                status,
                message,
            },
            SerializedError::Database { operation, message } => {
                CoreError::Database { operation, message }
            }
        }
    }
}
