// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the controller.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::dispatch;
use crate::error::ControllerError;
use crate::exchange::worker::spawn_exchange;
use crate::exchange::{CredentialSubmission, ExchangeCorrelation};
use crate::state::ControllerState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
}

/// Accept only a non-empty JSON object body.
fn require_object(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ControllerError> {
    match body {
        Ok(Json(value)) if value.as_object().is_some_and(|m| !m.is_empty()) => Ok(value),
        Ok(_) => {
            Err(ControllerError::InvalidRequestShape("expected a non-empty JSON object".to_owned()))
        }
        Err(rejection) => Err(ControllerError::InvalidRequestShape(rejection.body_text())),
    }
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { success: true })
}

/// `POST /issue-credential`: accept a submission and process it in the background.
///
/// Answers with freshly minted identifiers before any outbound call is made.
pub async fn submit_credential(
    State(s): State<Arc<ControllerState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let submission = match require_object(body).and_then(CredentialSubmission::from_json) {
        Ok(sub) => sub,
        Err(e) => {
            tracing::debug!(err = %e, "rejected credential submission");
            return e.to_http_response().into_response();
        }
    };

    let correlation = ExchangeCorrelation::mint();
    tracing::info!(
        exchange_id = %correlation.exchange_id,
        cred_def_id = submission.credential_definition_id.as_deref().unwrap_or(""),
        caller_connection_id = submission.connection_id.as_deref().unwrap_or(""),
        claims = submission.credential_values.len(),
        "credential submission accepted"
    );

    let ack = correlation.ack();
    // Detached: the handle is dropped and failures stay in the worker's log.
    let _ = spawn_exchange(Arc::clone(&s.cache), Arc::clone(&s.notifier), submission, correlation);

    Json(ack).into_response()
}

/// `POST /api/agentcb/topic/{topic}/`: agent webhook, dispatched by topic.
pub async fn agent_callback(
    State(s): State<Arc<ControllerState>>,
    Path(topic): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let message = match require_object(body) {
        Ok(message) => message,
        Err(e) => return e.to_http_response().into_response(),
    };

    match dispatch(s.handlers.as_ref(), &topic, &message) {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            tracing::warn!(topic = %topic, message = %message, "callback with invalid topic");
            e.to_http_response().into_response()
        }
    }
}

/// Fallback for unrouted paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "Not found" })))
}
