// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential exchanges: caller submissions, their correlation triple, the
//! registry record built from them, and the detached worker that delivers it.

pub mod record;
pub mod worker;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ControllerError;
use crate::ids::new_id;

/// Simplified credential request as sent by the caller.
///
/// The typed fields are a lenient view over the body; the body itself is kept
/// verbatim so the confirmation echoes exactly what the caller sent.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialSubmission {
    pub connection_id: Option<String>,
    pub credential_definition_id: Option<String>,
    pub credential_values: BTreeMap<String, Value>,
    raw: Value,
}

/// Fields the controller reads from a submission body.
#[derive(Deserialize)]
struct SubmissionFields {
    #[serde(default)]
    connection_id: Value,
    #[serde(default)]
    credential_definition_id: Option<String>,
    #[serde(default)]
    credential_values: Option<BTreeMap<String, Value>>,
}

impl CredentialSubmission {
    /// Decode a submission body, which must be a non-empty JSON object.
    ///
    /// `connection_id` may hold any JSON value; only a string is read back.
    pub fn from_json(body: Value) -> Result<Self, ControllerError> {
        match &body {
            Value::Object(map) if !map.is_empty() => {}
            _ => {
                return Err(ControllerError::InvalidRequestShape(
                    "expected a non-empty JSON object".to_owned(),
                ))
            }
        }
        let fields = SubmissionFields::deserialize(&body)
            .map_err(|e| ControllerError::InvalidRequestShape(e.to_string()))?;
        Ok(Self {
            connection_id: fields.connection_id.as_str().map(str::to_owned),
            credential_definition_id: fields.credential_definition_id,
            credential_values: fields.credential_values.unwrap_or_default(),
            raw: body,
        })
    }

    /// The body exactly as the caller sent it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

/// Identifiers minted for one exchange before its worker starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeCorrelation {
    pub exchange_id: String,
    pub thread_id: String,
    pub connection_id: String,
}

impl ExchangeCorrelation {
    pub fn mint() -> Self {
        Self { exchange_id: new_id(), thread_id: new_id(), connection_id: new_id() }
    }

    pub fn ack(&self) -> SubmissionAck {
        SubmissionAck {
            credential_exchange_id: self.exchange_id.clone(),
            connection_id: self.connection_id.clone(),
        }
    }
}

/// Synchronous answer to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAck {
    pub credential_exchange_id: String,
    pub connection_id: String,
}

/// Callback telling the caller its credential reached the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub state: String,
    pub credential_exchange_id: String,
    pub thread_id: String,
    pub message: Value,
}

impl Confirmation {
    pub const STORED: &'static str = "stored";

    pub fn stored(correlation: &ExchangeCorrelation, submission: CredentialSubmission) -> Self {
        Self {
            state: Self::STORED.to_owned(),
            credential_exchange_id: correlation.exchange_id.clone(),
            thread_id: correlation.thread_id.clone(),
            message: submission.into_raw(),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
