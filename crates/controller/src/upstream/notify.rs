// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound notifications: records to the registry, confirmations to the caller.

use reqwest::Client;
use serde::Serialize;

use crate::error::ControllerError;

/// Posts JSON to the two notification targets of a credential exchange.
pub struct Notifier {
    client: Client,
    registry_url: String,
    confirmation_url: String,
}

impl Notifier {
    pub fn new(client: Client, registry_url: String, confirmation_url: String) -> Self {
        Self { client, registry_url, confirmation_url }
    }

    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    pub fn confirmation_url(&self) -> &str {
        &self.confirmation_url
    }

    /// Hand a built record to the downstream registry.
    pub async fn post_record(&self, record: &impl Serialize) -> Result<(), ControllerError> {
        self.post_json(&self.registry_url, record).await.map_err(|e| {
            ControllerError::DownstreamTransmissionFailure(format!(
                "registry {}: {e:#}",
                self.registry_url
            ))
        })
    }

    /// Tell the originating caller its exchange completed.
    pub async fn post_confirmation(
        &self,
        confirmation: &impl Serialize,
    ) -> Result<(), ControllerError> {
        self.post_json(&self.confirmation_url, confirmation).await.map_err(|e| {
            ControllerError::DownstreamTransmissionFailure(format!(
                "confirmation {}: {e:#}",
                self.confirmation_url
            ))
        })
    }

    async fn post_json(&self, url: &str, body: &impl Serialize) -> anyhow::Result<()> {
        self.client.post(url).json(body).send().await?.error_for_status()?;
        Ok(())
    }
}
