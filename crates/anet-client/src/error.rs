use anet_core::models::FieldError;
use anet_core::AnetError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when a JSON error body carries neither `message` nor `error`.
pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permissions to perform this action";

/// Message used for a non-JSON HTTP 500.
pub const SERVER_ERROR_MESSAGE: &str =
    "An Error occured! Please contact the administrator and let them know what you were doing to get this error";

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status_text}: {message}")]
    Http {
        status: u16,
        status_text: String,
        message: String,
    },

    #[error("GraphQL error: {}", join_messages(.0))]
    GraphQl(Vec<GraphQlError>),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{}", join_field_errors(.0))]
    InvalidForm(Vec<FieldError>),

    #[error(transparent)]
    Core(#[from] AnetError),
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Normalized failure shape handed to callers for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub status_text: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The message a caller shows to the user.
    pub fn message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::GraphQl(errors) => join_messages(errors),
            other => other.to_string(),
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let status_text = match self {
            ApiError::Http { status_text, .. } => status_text.clone(),
            _ => String::new(),
        };
        ErrorBody {
            status: self.status(),
            status_text,
            message: self.message(),
        }
    }

    /// Banner text: `statusText: message`, or just the message when there is
    /// no status text.
    pub fn display_message(&self) -> String {
        let body = self.to_body();
        if body.status_text.is_empty() {
            body.message
        } else {
            format!("{}: {}", body.status_text, body.message)
        }
    }
}
