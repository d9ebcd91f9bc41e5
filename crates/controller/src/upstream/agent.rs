// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queries against the identity agent's admin API.

use std::future::Future;

use anyhow::Context;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Read-only metadata queries the controller makes against the agent.
///
/// Implemented over HTTP by [`AgentClient`]; the metadata cache is generic
/// over this trait so tests can substitute a counting double.
pub trait AgentQuery: Send + Sync {
    /// The agent's public DID.
    fn public_did(&self) -> impl Future<Output = anyhow::Result<String>> + Send;

    /// Identifiers of every schema the agent has created.
    fn schema_ids(&self) -> impl Future<Output = anyhow::Result<Vec<String>>> + Send;

    /// Body of one schema.
    fn schema(&self, schema_id: &str) -> impl Future<Output = anyhow::Result<Schema>> + Send;

    /// Identifiers of every credential definition the agent has created.
    fn credential_definition_ids(
        &self,
    ) -> impl Future<Output = anyhow::Result<Vec<String>>> + Send;

    /// Body of one credential definition, as returned by the agent.
    fn credential_definition(
        &self,
        cred_def_id: &str,
    ) -> impl Future<Output = anyhow::Result<serde_json::Value>> + Send;
}

/// Schema body as published by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub id: String,
    /// Ledger sequence number; credential definitions reference schemas by it.
    #[serde(default, rename = "seqNo")]
    pub seq_no: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, rename = "attrNames")]
    pub attr_names: Vec<String>,
}

// -- Wire envelopes -----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PublicDidResponse {
    result: Option<DidResult>,
}

#[derive(Debug, Deserialize)]
struct DidResult {
    did: String,
}

#[derive(Debug, Deserialize)]
struct SchemaIdsResponse {
    schema_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SchemaResponse {
    schema_json: Schema,
}

#[derive(Debug, Deserialize)]
struct CredDefIdsResponse {
    credential_definition_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CredDefResponse {
    credential_definition: serde_json::Value,
}

// -- HTTP implementation ------------------------------------------------------

/// HTTP client for the agent admin API.
pub struct AgentClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl AgentClient {
    pub fn new(base_url: &str, api_key: Option<String>, client: Client) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), api_key, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("X-API-Key", key),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let req = self.client.get(self.url(path));
        let resp = self.apply_auth(req).send().await?.error_for_status()?;
        let value = resp.json().await.with_context(|| format!("malformed payload from {path}"))?;
        Ok(value)
    }
}

impl AgentQuery for AgentClient {
    async fn public_did(&self) -> anyhow::Result<String> {
        let resp: PublicDidResponse = self.get_json("/wallet/did/public").await?;
        match resp.result {
            Some(result) if !result.did.is_empty() => Ok(result.did),
            _ => anyhow::bail!("agent has no public DID"),
        }
    }

    async fn schema_ids(&self) -> anyhow::Result<Vec<String>> {
        let resp: SchemaIdsResponse = self.get_json("/schemas/created").await?;
        Ok(resp.schema_ids)
    }

    async fn schema(&self, schema_id: &str) -> anyhow::Result<Schema> {
        let resp: SchemaResponse = self.get_json(&format!("/schemas/{schema_id}")).await?;
        Ok(resp.schema_json)
    }

    async fn credential_definition_ids(&self) -> anyhow::Result<Vec<String>> {
        let resp: CredDefIdsResponse = self.get_json("/credential-definitions/created").await?;
        Ok(resp.credential_definition_ids)
    }

    async fn credential_definition(&self, cred_def_id: &str) -> anyhow::Result<serde_json::Value> {
        let resp: CredDefResponse =
            self.get_json(&format!("/credential-definitions/{cred_def_id}")).await?;
        Ok(resp.credential_definition)
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
