// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issuer controller: mediates credential issuance between an identity agent
//! and a downstream credential registry.
//!
//! Submissions are acknowledged immediately and completed by a detached
//! worker that resolves agent metadata, posts the built record to the
//! registry and then confirms back to the caller. Agent webhooks are routed
//! by topic to a configurable handler set.

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod exchange;
pub mod ids;
pub mod state;
pub mod test_support;
pub mod transport;
pub mod upstream;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::ControllerConfig;
use crate::state::ControllerState;
use crate::transport::build_router;

/// Run the controller until Ctrl-C.
pub async fn run(config: ControllerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let shutdown = CancellationToken::new();

    tracing::info!(
        agent = %config.agent_admin_url,
        registry = %config.registry_url,
        confirmation = %config.confirmation_url,
        handlers = %config.handlers,
        "initializing issuer controller"
    );
    let state = Arc::new(ControllerState::new(config)?);

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
            }
            shutdown.cancel();
        });
    }

    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("issuer controller listening on {addr}");
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
