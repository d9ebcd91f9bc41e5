// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lazily populated agent metadata: the public DID and the credential
//! definition → schema index.
//!
//! Both values are fetched at most once per process and never invalidated.
//! A single async mutex serializes population; readers check the populated
//! value before and after taking it, so racing first callers share one fetch
//! and later reads never touch the lock. A failed fetch leaves the value
//! unset and the next caller retries.

use std::collections::HashMap;
use std::sync::OnceLock;

use tokio::sync::Mutex;

use crate::error::ControllerError;
use crate::upstream::agent::{AgentQuery, Schema};

/// A credential definition and the schema it was issued against.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialDefinitionEntry {
    pub credential_definition: serde_json::Value,
    /// `None` when no known schema carries the definition's sequence number.
    pub schema_id: Option<String>,
}

pub type CredentialDefinitionIndex = HashMap<String, CredentialDefinitionEntry>;

/// Process-wide cache of agent metadata, generic over the query backend.
pub struct AgentMetadataCache<Q> {
    query: Q,
    populate: Mutex<()>,
    agent_did: OnceLock<String>,
    cred_def_index: OnceLock<CredentialDefinitionIndex>,
}

impl<Q: AgentQuery> AgentMetadataCache<Q> {
    pub fn new(query: Q) -> Self {
        Self {
            query,
            populate: Mutex::new(()),
            agent_did: OnceLock::new(),
            cred_def_index: OnceLock::new(),
        }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// The agent's public DID, fetched on first use.
    pub async fn agent_did(&self) -> Result<String, ControllerError> {
        if let Some(did) = self.agent_did.get() {
            return Ok(did.clone());
        }

        let _guard = self.populate.lock().await;
        if let Some(did) = self.agent_did.get() {
            return Ok(did.clone());
        }

        let did = self.query.public_did().await.map_err(|e| {
            tracing::warn!(err = %e, "failed to fetch agent DID");
            ControllerError::UpstreamUnavailable(format!("{e:#}"))
        })?;
        tracing::info!(did = %did, "cached agent DID");
        Ok(self.agent_did.get_or_init(|| did).clone())
    }

    /// Schema identifier linked to a credential definition.
    pub async fn schema_id(&self, cred_def_id: &str) -> Result<String, ControllerError> {
        let entry = self.credential_definition(cred_def_id).await?;
        entry
            .schema_id
            .clone()
            .ok_or_else(|| ControllerError::UnknownCredentialDefinition(cred_def_id.to_owned()))
    }

    /// Cached entry for a credential definition, populating the index on first use.
    pub async fn credential_definition(
        &self,
        cred_def_id: &str,
    ) -> Result<&CredentialDefinitionEntry, ControllerError> {
        self.index()
            .await?
            .get(cred_def_id)
            .ok_or_else(|| ControllerError::UnknownCredentialDefinition(cred_def_id.to_owned()))
    }

    async fn index(&self) -> Result<&CredentialDefinitionIndex, ControllerError> {
        if let Some(index) = self.cred_def_index.get() {
            return Ok(index);
        }

        let _guard = self.populate.lock().await;
        if let Some(index) = self.cred_def_index.get() {
            return Ok(index);
        }

        let index = build_index(&self.query).await.map_err(|e| {
            tracing::warn!(err = %e, "failed to build credential definition index");
            ControllerError::UpstreamUnavailable(format!("{e:#}"))
        })?;
        tracing::info!(definitions = index.len(), "cached credential definition index");
        Ok(self.cred_def_index.get_or_init(|| index))
    }
}

/// Fetch every schema and credential definition and link them by sequence number.
async fn build_index<Q: AgentQuery>(query: &Q) -> anyhow::Result<CredentialDefinitionIndex> {
    let schema_ids = query.schema_ids().await?;
    let mut schemas = Vec::with_capacity(schema_ids.len());
    for schema_id in &schema_ids {
        schemas.push(query.schema(schema_id).await?);
    }

    let cred_def_ids = query.credential_definition_ids().await?;
    let mut definitions = Vec::with_capacity(cred_def_ids.len());
    for cred_def_id in cred_def_ids {
        let body = query.credential_definition(&cred_def_id).await?;
        definitions.push((cred_def_id, body));
    }

    let mut index = HashMap::with_capacity(definitions.len());
    for (cred_def_id, body) in definitions {
        let schema_id = link_schema(&body, &schemas);
        if schema_id.is_none() {
            tracing::warn!(cred_def_id = %cred_def_id, "no schema matches credential definition");
        }
        index.insert(cred_def_id, CredentialDefinitionEntry { credential_definition: body, schema_id });
    }
    Ok(index)
}

/// Find the schema whose sequence number the definition embeds as `schemaId`.
pub fn link_schema(definition: &serde_json::Value, schemas: &[Schema]) -> Option<String> {
    let seq_no = schema_seq_no(definition)?;
    schemas.iter().find(|s| s.seq_no == Some(seq_no)).map(|s| s.id.clone())
}

/// Sequence number embedded in a definition. The agent emits it as a string.
fn schema_seq_no(definition: &serde_json::Value) -> Option<u64> {
    match definition.get("schemaId")? {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
