// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failures raised by the controller.
///
/// `InvalidRequestShape` and `UnknownTopic` are answered synchronously. The
/// rest only occur inside a detached exchange worker, where they are logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    InvalidRequestShape(String),
    UnknownTopic(String),
    UpstreamUnavailable(String),
    UnknownCredentialDefinition(String),
    MissingCredentialDefinition,
    DownstreamTransmissionFailure(String),
}

impl ControllerError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequestShape(_) | Self::UnknownTopic(_) => 400,
            Self::MissingCredentialDefinition => 400,
            Self::UnknownCredentialDefinition(_) => 404,
            Self::UpstreamUnavailable(_) | Self::DownstreamTransmissionFailure(_) => 502,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequestShape(_) => "INVALID_REQUEST_SHAPE",
            Self::UnknownTopic(_) => "UNKNOWN_TOPIC",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::UnknownCredentialDefinition(_) => "UNKNOWN_CREDENTIAL_DEFINITION",
            Self::MissingCredentialDefinition => "MISSING_CREDENTIAL_DEFINITION",
            Self::DownstreamTransmissionFailure(_) => "DOWNSTREAM_TRANSMISSION_FAILURE",
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody { code: self.as_str().to_owned(), message: self.to_string() }
    }

    pub fn to_http_response(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse { error: self.to_error_body() }))
    }
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequestShape(msg) => write!(f, "invalid request: {msg}"),
            Self::UnknownTopic(topic) => write!(f, "Invalid topic: {topic}"),
            Self::UpstreamUnavailable(msg) => write!(f, "agent unavailable: {msg}"),
            Self::UnknownCredentialDefinition(id) => {
                write!(f, "no schema linkage for credential definition {id}")
            }
            Self::MissingCredentialDefinition => {
                f.write_str("submission has no credential_definition_id")
            }
            Self::DownstreamTransmissionFailure(msg) => write!(f, "transmission failed: {msg}"),
        }
    }
}

impl std::error::Error for ControllerError {}

/// Top-level error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error body with machine-readable code and human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
