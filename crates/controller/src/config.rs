// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;

use crate::dispatch::HandlerSet;

/// Credential-issuance controller between an identity agent and a credential registry.
#[derive(Debug, Clone, Parser)]
#[command(name = "issuer-controller", version, about)]
pub struct ControllerConfig {
    /// Host to bind on.
    #[arg(long, default_value = "0.0.0.0", env = "ISSUER_CONTROLLER_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000, env = "ISSUER_CONTROLLER_PORT")]
    pub port: u16,

    /// Base URL of the identity agent's admin API.
    #[arg(long, default_value = "http://localhost:8024", env = "AGENT_ADMIN_URL")]
    pub agent_admin_url: String,

    /// API key for the agent admin API, sent as `X-API-Key`.
    #[arg(long, env = "AGENT_ADMIN_API_KEY")]
    pub agent_admin_api_key: Option<String>,

    /// Downstream registry endpoint that receives built credential records.
    #[arg(
        long,
        default_value = "http://localhost:8080/api/agentcb/topic/credentials",
        env = "REGISTRY_URL"
    )]
    pub registry_url: String,

    /// Callback endpoint that receives the `stored` confirmation for each exchange.
    #[arg(
        long,
        default_value = "http://myorg-controller:5000/api/agentcb/topic/credentials",
        env = "CONFIRMATION_URL"
    )]
    pub confirmation_url: String,

    /// Topic sub-handlers wired into the webhook dispatcher [issuer, anonymous].
    #[arg(long, default_value = "issuer", env = "ISSUER_CONTROLLER_HANDLERS")]
    pub handlers: HandlerSet,

    /// Timeout for every outbound HTTP call in milliseconds.
    #[arg(long, default_value_t = 10000, env = "ISSUER_CONTROLLER_HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: u64,

    /// Log filter directive (e.g. `info`, `issuer_controller=debug`).
    #[arg(long, default_value = "info", env = "ISSUER_CONTROLLER_LOG")]
    pub log_level: String,

    /// Log output format [text, json].
    #[arg(long, default_value = "text", env = "ISSUER_CONTROLLER_LOG_FORMAT")]
    pub log_format: String,
}

impl ControllerConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings that would only fail later inside a detached worker.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("agent-admin-url", &self.agent_admin_url),
            ("registry-url", &self.registry_url),
            ("confirmation-url", &self.confirmation_url),
        ] {
            if url.trim().is_empty() {
                anyhow::bail!("--{name} must not be empty");
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("--{name} must be an http(s) URL, got {url}");
            }
        }
        if self.http_timeout_ms == 0 {
            anyhow::bail!("--http-timeout-ms must be greater than zero");
        }
        match self.log_format.as_str() {
            "text" | "json" => Ok(()),
            other => anyhow::bail!("invalid log format: {other}"),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
