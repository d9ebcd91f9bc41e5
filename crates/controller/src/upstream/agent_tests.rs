// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use super::*;
use crate::cache::AgentMetadataCache;
use crate::test_support::{spawn_mock_agent, AgentFixture};
use crate::upstream::http_client;

fn client_for(url: &str, api_key: Option<&str>) -> anyhow::Result<AgentClient> {
    Ok(AgentClient::new(url, api_key.map(str::to_owned), http_client(Duration::from_secs(5))?))
}

#[tokio::test]
async fn reads_did_schemas_and_definitions() -> anyhow::Result<()> {
    let server = spawn_mock_agent(AgentFixture::sample()).await?;
    let client = client_for(&format!("{}/", server.url()), None)?;

    assert_eq!(client.public_did().await?, "did:example:1");
    assert_eq!(client.schema_ids().await?, vec!["sch1".to_owned(), "sch2".to_owned()]);

    let schema = client.schema("sch2").await?;
    assert_eq!(schema.seq_no, Some(20));
    assert_eq!(schema.attr_names, vec!["foo".to_owned()]);

    assert_eq!(client.credential_definition_ids().await?.len(), 3);
    let def = client.credential_definition("cd1").await?;
    assert_eq!(def["schemaId"], "15");
    Ok(())
}

#[tokio::test]
async fn missing_public_did_is_an_error() -> anyhow::Result<()> {
    let fixture = AgentFixture { did: None, ..AgentFixture::sample() };
    let server = spawn_mock_agent(fixture).await?;
    let client = client_for(&server.url(), None)?;
    assert!(client.public_did().await.is_err());
    Ok(())
}

#[tokio::test]
async fn non_success_status_is_an_error() -> anyhow::Result<()> {
    let server = spawn_mock_agent(AgentFixture::sample()).await?;
    let client = client_for(&server.url(), None)?;
    assert!(client.schema("unknown").await.is_err());
    assert!(client.credential_definition("unknown").await.is_err());
    Ok(())
}

#[tokio::test]
async fn malformed_payload_is_an_error() -> anyhow::Result<()> {
    let app = Router::new()
        .route("/schemas/created", get(|| async { Json(json!({ "ids": ["sch1"] })) }))
        .route("/wallet/did/public", get(|| async { "not json" }));
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = client_for(&format!("http://{addr}"), None)?;
    assert!(client.schema_ids().await.is_err());
    assert!(client.public_did().await.is_err());
    Ok(())
}

#[tokio::test]
async fn api_key_is_sent_when_configured() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/wallet/did/public",
        get(|headers: HeaderMap| async move {
            match headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
                Some("secret") => (StatusCode::OK, Json(json!({ "result": { "did": "did:k" } }))),
                _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let url = format!("http://{addr}");
    assert_eq!(client_for(&url, Some("secret"))?.public_did().await?, "did:k");
    assert!(client_for(&url, None)?.public_did().await.is_err());
    Ok(())
}

#[tokio::test]
async fn cache_over_http_populates_once() -> anyhow::Result<()> {
    let server = spawn_mock_agent(AgentFixture::sample()).await?;
    let cache = AgentMetadataCache::new(client_for(&server.url(), None)?);

    assert_eq!(cache.schema_id("cd1").await?, "sch1");
    // schema list + 2 schemas + definition list + 3 definitions
    assert_eq!(server.hits.load(Ordering::SeqCst), 7);

    assert_eq!(cache.schema_id("cd2").await?, "sch2");
    assert_eq!(server.hits.load(Ordering::SeqCst), 7);
    Ok(())
}
