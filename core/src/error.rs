//! Error types for the admin client core.
//!
//! # Design
//! `ApiError` covers everything that can go wrong talking to the remote
//! collection. `NotFound` gets a dedicated variant because callers frequently
//! distinguish "the resource does not exist" from "the server returned an
//! unexpected status." All other non-2xx responses land in `HttpError` with
//! the raw status code and body for debugging.
//!
//! `WorkflowError` is returned when a user intent is not allowed in the
//! current screen state. These never reach the remote layer and are never
//! shown as toasts.

use thiserror::Error;

use crate::types::EntityId;

/// Errors returned by the API client and `EntityApi` implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the requested record does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Rejected user intents on a screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("a save is already in flight")]
    SaveInFlight,

    #[error("record {0} is already being deleted")]
    DeleteInFlight(EntityId),

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("record {0} is not in the list")]
    UnknownEntity(EntityId),

    #[error("{0}")]
    Invalid(String),

    #[error("the collection was already loaded")]
    AlreadyLoaded,

    #[error("screen is unmounted")]
    Unmounted,
}

/// Invalid values in the client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Why a login form refused to submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("the form has visible validation errors")]
    Blocked,

    #[error("required field {0} is empty")]
    MissingField(&'static str),

    #[error("invalid username or password")]
    InvalidCredentials,
}
