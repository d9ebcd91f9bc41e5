// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound HTTP collaborators: the agent admin API and the notification targets.

pub mod agent;
pub mod notify;

use std::time::Duration;

use reqwest::Client;

/// Build the shared `reqwest` client used for every outbound call.
///
/// Installs the ring crypto provider first; a second install is a no-op.
pub fn http_client(timeout: Duration) -> anyhow::Result<Client> {
    let _ = rustls::crypto::ring::default_provider().install_default();
    let client = Client::builder().timeout(timeout).build()?;
    Ok(client)
}
