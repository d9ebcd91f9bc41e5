// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP front end: credential submission and agent webhooks.

pub mod http;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::ControllerState;

/// Build the axum `Router` with all controller routes.
pub fn build_router(state: Arc<ControllerState>) -> Router {
    Router::new()
        .route("/health", get(http::health))
        // Credential submission (both historical paths)
        .route("/issue-credential", post(http::submit_credential))
        .route("/api/credential_exchange/send", post(http::submit_credential))
        // Agent webhooks
        .route("/api/agentcb/topic/{topic}", post(http::agent_callback))
        .route("/api/agentcb/topic/{topic}/", post(http::agent_callback))
        .fallback(http::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
