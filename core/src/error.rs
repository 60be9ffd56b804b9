//! Error types for the BattleMetrics client.
//!
//! # Design
//! `ApiError` describes why a single request failed: transport, status or
//! body shape. `ClientError` is what callers see. Construction problems are
//! reported directly; every request failure is wrapped in
//! `ClientError::Request` together with the operation and the id or query it
//! targeted.

use std::fmt;

use thiserror::Error;

/// Errors produced while executing or parsing a single request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the requested player does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server rejected the bearer token (401 or 403).
    #[error("unauthorized: {body}")]
    Unauthorized { status: u16, body: String },

    /// The server returned any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(#[source] serde_json::Error),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A pagination link pointed outside the configured base URL.
    #[error("link `{0}` is not under the configured base URL")]
    ForeignLink(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(Box::new(err))
    }
}

/// Client operation, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListPlayers,
    GetPlayer,
    QuickMatch,
    RelatedIdentifiers,
    FollowLink,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ListPlayers => "list_players",
            Operation::GetPlayer => "get_player_by_id",
            Operation::QuickMatch => "quick_match",
            Operation::RelatedIdentifiers => "get_related_identifiers",
            Operation::FollowLink => "follow_link",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the client surface.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API token was missing or empty.
    #[error("invalid token provided for BattleMetrics API")]
    MissingToken,

    #[error("invalid base URL `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP transport could not be initialised.
    #[error("failed to initialise transport: {0}")]
    Transport(#[source] ApiError),

    /// A request failed. `target` is the player id, search text, identifier
    /// query or link the operation was called with.
    #[error("{operation} failed for {target}: {source}")]
    Request {
        operation: Operation,
        target: String,
        #[source]
        source: ApiError,
    },
}

impl ClientError {
    /// The underlying request error, if this is a request failure.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Request { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.api_error(), Some(ApiError::NotFound))
    }
}
