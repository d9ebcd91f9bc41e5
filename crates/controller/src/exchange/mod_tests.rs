// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::*;

#[test]
fn submission_decodes_and_keeps_unknown_fields() -> anyhow::Result<()> {
    let body = json!({
        "connection_id": "c1",
        "credential_definition_id": "cd1",
        "credential_values": { "foo": "bar" },
        "comment": "hello"
    });
    let submission = CredentialSubmission::from_json(body.clone())?;
    assert_eq!(submission.connection_id.as_deref(), Some("c1"));
    assert_eq!(submission.credential_definition_id.as_deref(), Some("cd1"));
    assert_eq!(submission.credential_values["foo"], "bar");

    assert_eq!(submission.raw(), &body);
    Ok(())
}

#[test]
fn submission_without_definition_still_decodes() -> anyhow::Result<()> {
    let submission = CredentialSubmission::from_json(json!({ "credential_values": {} }))?;
    assert_eq!(submission.credential_definition_id, None);
    Ok(())
}

#[yare::parameterized(
    empty_object = { json!({}) },
    array = { json!(["cd1"]) },
    string = { json!("cd1") },
    null = { json!(null) },
    values_not_object = { json!({ "credential_values": ["foo"] }) },
    numeric_definition = { json!({ "credential_definition_id": 7 }) },
)]
fn malformed_submissions_are_rejected(body: Value) {
    let err = CredentialSubmission::from_json(body).err();
    assert!(matches!(err, Some(ControllerError::InvalidRequestShape(_))), "got {err:?}");
}

#[test]
fn non_string_connection_id_is_accepted() -> anyhow::Result<()> {
    let body = json!({ "connection_id": 7, "credential_definition_id": "cd1" });
    let submission = CredentialSubmission::from_json(body.clone())?;
    assert_eq!(submission.connection_id, None);
    assert_eq!(submission.raw(), &body);
    Ok(())
}

#[test]
fn null_values_decode_as_no_claims() -> anyhow::Result<()> {
    let submission = CredentialSubmission::from_json(
        json!({ "credential_definition_id": "cd1", "credential_values": null }),
    )?;
    assert!(submission.credential_values.is_empty());
    Ok(())
}

#[test]
fn correlation_ids_are_distinct() {
    let c = ExchangeCorrelation::mint();
    assert_ne!(c.exchange_id, c.thread_id);
    assert_ne!(c.exchange_id, c.connection_id);
    assert_ne!(c, ExchangeCorrelation::mint());
}

#[test]
fn ack_echoes_minted_ids() {
    let c = ExchangeCorrelation::mint();
    let ack = c.ack();
    assert_eq!(ack.credential_exchange_id, c.exchange_id);
    assert_eq!(ack.connection_id, c.connection_id);
}

#[test]
fn stored_confirmation_carries_submission() -> anyhow::Result<()> {
    let c = ExchangeCorrelation::mint();
    let submission = CredentialSubmission::from_json(json!({ "credential_definition_id": "cd1" }))?;
    let value = serde_json::to_value(Confirmation::stored(&c, submission))?;
    assert_eq!(value["state"], "stored");
    assert_eq!(value["credential_exchange_id"], c.exchange_id.as_str());
    assert_eq!(value["thread_id"], c.thread_id.as_str());
    assert_eq!(value["message"]["credential_definition_id"], "cd1");
    Ok(())
}

#[test]
fn confirmation_echoes_body_verbatim() -> anyhow::Result<()> {
    let c = ExchangeCorrelation::mint();
    let body = json!({ "connection_id": null, "credential_definition_id": "cd1" });
    let submission = CredentialSubmission::from_json(body.clone())?;
    let value = serde_json::to_value(Confirmation::stored(&c, submission))?;
    assert_eq!(value["message"], body);
    assert!(value["message"].get("credential_values").is_none());
    Ok(())
}
