// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topic routing for agent webhook events.
//!
//! Stateless: each event is classified by its path topic and, for the
//! connection/credential/presentation topics, by the payload's `state` field.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::ControllerError;

/// Closed set of webhook topics the agent emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Connections,
    ConnectionsActivity,
    Credentials,
    Presentations,
    GetActiveMenu,
    PerformMenuAction,
    IssuerRegistration,
    ProblemReport,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Self::Connections,
        Self::ConnectionsActivity,
        Self::Credentials,
        Self::Presentations,
        Self::GetActiveMenu,
        Self::PerformMenuAction,
        Self::IssuerRegistration,
        Self::ProblemReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connections => "connections",
            Self::ConnectionsActivity => "connections_activity",
            Self::Credentials => "credentials",
            Self::Presentations => "presentations",
            Self::GetActiveMenu => "get_active_menu",
            Self::PerformMenuAction => "perform_menu_action",
            Self::IssuerRegistration => "issuer_registration",
            Self::ProblemReport => "problem_report",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topic {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ControllerError::UnknownTopic(s.to_owned()))
    }
}

/// Empty acknowledgment returned for handled events.
pub fn ack() -> Value {
    json!({})
}

/// Per-topic event handlers. Every method defaults to an empty acknowledgment.
pub trait TopicHandlers: Send + Sync {
    fn connections(&self, _state: &str, _message: &Value) -> Value {
        ack()
    }

    fn credentials(&self, _state: &str, _message: &Value) -> Value {
        ack()
    }

    fn presentations(&self, _state: &str, _message: &Value) -> Value {
        ack()
    }

    fn get_active_menu(&self, _message: &Value) -> Value {
        ack()
    }

    fn perform_menu_action(&self, _message: &Value) -> Value {
        ack()
    }

    fn issuer_registration(&self, _message: &Value) -> Value {
        ack()
    }

    fn problem_report(&self, _message: &Value) -> Value {
        ack()
    }
}

/// Stub handlers for an agent that issues anonymously: every event is acknowledged.
pub struct AnonymousHandlers;

impl TopicHandlers for AnonymousHandlers {}

/// Handlers for the issuing deployment: acknowledge and log each event.
pub struct IssuerHandlers;

fn field<'a>(message: &'a Value, key: &str) -> &'a str {
    message.get(key).and_then(Value::as_str).unwrap_or("")
}

impl TopicHandlers for IssuerHandlers {
    fn connections(&self, state: &str, message: &Value) -> Value {
        tracing::info!(
            state,
            connection_id = field(message, "connection_id"),
            their_label = field(message, "their_label"),
            "connection state changed"
        );
        ack()
    }

    fn credentials(&self, state: &str, message: &Value) -> Value {
        tracing::info!(
            state,
            credential_exchange_id = field(message, "credential_exchange_id"),
            connection_id = field(message, "connection_id"),
            "credential exchange state changed"
        );
        ack()
    }

    fn presentations(&self, state: &str, message: &Value) -> Value {
        tracing::info!(
            state,
            presentation_exchange_id = field(message, "presentation_exchange_id"),
            connection_id = field(message, "connection_id"),
            "presentation exchange state changed"
        );
        ack()
    }

    fn get_active_menu(&self, message: &Value) -> Value {
        tracing::debug!(connection_id = field(message, "connection_id"), "active menu requested");
        ack()
    }

    fn perform_menu_action(&self, message: &Value) -> Value {
        tracing::debug!(
            connection_id = field(message, "connection_id"),
            action = field(message, "action_name"),
            "menu action requested"
        );
        ack()
    }

    fn issuer_registration(&self, message: &Value) -> Value {
        tracing::info!(
            connection_id = field(message, "connection_id"),
            "issuer registration event received"
        );
        ack()
    }

    fn problem_report(&self, message: &Value) -> Value {
        tracing::warn!(
            connection_id = field(message, "connection_id"),
            explain = field(message, "explain-ltxt"),
            "problem report received"
        );
        ack()
    }
}

/// Which handler set the dispatcher is wired with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandlerSet {
    #[default]
    Issuer,
    Anonymous,
}

impl HandlerSet {
    pub fn build(self) -> Arc<dyn TopicHandlers> {
        match self {
            Self::Issuer => Arc::new(IssuerHandlers),
            Self::Anonymous => Arc::new(AnonymousHandlers),
        }
    }
}

impl std::fmt::Display for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Issuer => f.write_str("issuer"),
            Self::Anonymous => f.write_str("anonymous"),
        }
    }
}

impl std::str::FromStr for HandlerSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "issuer" => Ok(Self::Issuer),
            "anonymous" | "anon" => Ok(Self::Anonymous),
            other => anyhow::bail!("invalid handler set: {other}"),
        }
    }
}

/// Route one webhook event to its handler.
pub fn dispatch(
    handlers: &dyn TopicHandlers,
    topic: &str,
    message: &Value,
) -> Result<Value, ControllerError> {
    let topic: Topic = topic.parse()?;
    let state = message.get("state").map(|s| s.as_str().unwrap_or_default());

    let reply = match (topic, state) {
        (Topic::Connections, Some(state)) => handlers.connections(state, message),
        (Topic::Credentials, Some(state)) => handlers.credentials(state, message),
        (Topic::Presentations, Some(state)) => handlers.presentations(state, message),
        (Topic::Connections | Topic::Credentials | Topic::Presentations, None) => ack(),
        (Topic::ConnectionsActivity, _) => ack(),
        (Topic::GetActiveMenu, _) => handlers.get_active_menu(message),
        (Topic::PerformMenuAction, _) => handlers.perform_menu_action(message),
        (Topic::IssuerRegistration, _) => handlers.issuer_registration(message),
        (Topic::ProblemReport, _) => handlers.problem_report(message),
    };
    Ok(reply)
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
