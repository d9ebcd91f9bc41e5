// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry record assembly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::AgentMetadataCache;
use crate::error::ControllerError;
use crate::exchange::{CredentialSubmission, ExchangeCorrelation};
use crate::upstream::agent::AgentQuery;

/// Marker for cryptographic material this controller never produces.
pub const NOT_USED: &str = "not_used";

/// State reported for every record handed to the registry.
pub const RECORD_STATE: &str = "stored";

/// One claim as the registry expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimValue {
    pub raw: Value,
    pub encoded: String,
}

/// Credential record in the shape the downstream registry ingests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub credential_exchange_id: String,
    pub thread_id: String,
    pub connection_id: String,
    pub state: String,
    pub issuer_did: String,
    pub credential_definition_id: String,
    pub schema_id: String,
    pub credential_offer: String,
    pub credential_request: String,
    pub credential_request_metadata: String,
    pub signature: String,
    pub signature_correctness_proof: String,
    pub values: BTreeMap<String, ClaimValue>,
}

impl CredentialRecord {
    /// Assemble a record from already-resolved metadata.
    ///
    /// Claims are copied verbatim; names and value types are not checked.
    pub fn assemble(
        submission: &CredentialSubmission,
        correlation: &ExchangeCorrelation,
        credential_definition_id: &str,
        schema_id: &str,
        issuer_did: &str,
    ) -> Self {
        let values = submission
            .credential_values
            .iter()
            .map(|(name, raw)| {
                (name.clone(), ClaimValue { raw: raw.clone(), encoded: NOT_USED.to_owned() })
            })
            .collect();

        Self {
            credential_exchange_id: correlation.exchange_id.clone(),
            thread_id: correlation.thread_id.clone(),
            connection_id: correlation.connection_id.clone(),
            state: RECORD_STATE.to_owned(),
            issuer_did: issuer_did.to_owned(),
            credential_definition_id: credential_definition_id.to_owned(),
            schema_id: schema_id.to_owned(),
            credential_offer: NOT_USED.to_owned(),
            credential_request: NOT_USED.to_owned(),
            credential_request_metadata: NOT_USED.to_owned(),
            signature: NOT_USED.to_owned(),
            signature_correctness_proof: NOT_USED.to_owned(),
            values,
        }
    }
}

/// Resolve metadata for a submission and assemble its registry record.
///
/// A submission without a credential definition fails before the cache is consulted.
pub async fn build_record<Q: AgentQuery>(
    submission: &CredentialSubmission,
    correlation: &ExchangeCorrelation,
    cache: &AgentMetadataCache<Q>,
) -> Result<CredentialRecord, ControllerError> {
    let cred_def_id = submission
        .credential_definition_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ControllerError::MissingCredentialDefinition)?;

    let issuer_did = cache.agent_did().await?;
    let schema_id = cache.schema_id(cred_def_id).await?;
    Ok(CredentialRecord::assemble(submission, correlation, cred_def_id, &schema_id, &issuer_did))
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
