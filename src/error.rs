//! Error types and handling for the `Wanderlist` service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the `Wanderlist` service
#[derive(Error, Debug)]
pub enum WanderlistError {
    /// Missing or malformed request input
    #[error("{message}")]
    Validation { message: String },

    /// No list with the requested id
    #[error("List not found")]
    ListNotFound { id: u64 },

    /// Destination name is absent from the dataset
    #[error("Destination not found")]
    DestinationNotFound { name: String },

    /// Destination name is absent from the list being edited
    #[error("Destination not found in the list")]
    DestinationNotInList { name: String },

    /// Another list already carries this name
    #[error("A list named \"{name}\" already exists")]
    DuplicateName { name: String },

    /// The list already contains this destination
    #[error("\"{name}\" is already in this list")]
    DuplicateDestination { name: String },

    /// The dataset file could not be read or parsed
    #[error("Failed to read destinations: {message}")]
    SourceRead { message: String },

    /// List storage backend failure
    #[error("List store error: {message}")]
    Store { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WanderlistError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new dataset read error
    pub fn source_read<S: Into<String>>(message: S) -> Self {
        Self::SourceRead {
            message: message.into(),
        }
    }

    /// Create a new list store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ListNotFound { .. }
            | Self::DestinationNotFound { .. }
            | Self::DestinationNotInList { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateName { .. } | Self::DuplicateDestination { .. } => {
                StatusCode::CONFLICT
            }
            Self::SourceRead { .. } | Self::Store { .. } | Self::Config { .. } | Self::Io { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<csv::Error> for WanderlistError {
    fn from(err: csv::Error) -> Self {
        Self::source_read(err.to_string())
    }
}

impl From<fjall::Error> for WanderlistError {
    fn from(err: fjall::Error) -> Self {
        Self::store(err.to_string())
    }
}

impl From<postcard::Error> for WanderlistError {
    fn from(err: postcard::Error) -> Self {
        Self::store(format!("Failed to encode lists: {err}"))
    }
}

impl IntoResponse for WanderlistError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
