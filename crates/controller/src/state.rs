// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use crate::cache::AgentMetadataCache;
use crate::config::ControllerConfig;
use crate::dispatch::TopicHandlers;
use crate::upstream::agent::AgentClient;
use crate::upstream::http_client;
use crate::upstream::notify::Notifier;

/// Shared controller state handed to every request handler.
pub struct ControllerState {
    pub config: ControllerConfig,
    /// Agent metadata, populated on first use and kept for the process lifetime.
    pub cache: Arc<AgentMetadataCache<AgentClient>>,
    pub notifier: Arc<Notifier>,
    pub handlers: Arc<dyn TopicHandlers>,
}

impl ControllerState {
    /// Build state with the handler set selected in the config.
    pub fn new(config: ControllerConfig) -> anyhow::Result<Self> {
        let handlers = config.handlers.build();
        Self::with_handlers(config, handlers)
    }

    pub fn with_handlers(
        config: ControllerConfig,
        handlers: Arc<dyn TopicHandlers>,
    ) -> anyhow::Result<Self> {
        let client = http_client(config.http_timeout())?;
        let agent = AgentClient::new(
            &config.agent_admin_url,
            config.agent_admin_api_key.clone(),
            client.clone(),
        );
        let notifier =
            Notifier::new(client, config.registry_url.clone(), config.confirmation_url.clone());
        Ok(Self {
            config,
            cache: Arc::new(AgentMetadataCache::new(agent)),
            notifier: Arc::new(notifier),
            handlers,
        })
    }
}
