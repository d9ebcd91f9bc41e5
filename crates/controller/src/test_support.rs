// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: agent fixtures, an in-memory agent double,
//! and local HTTP servers standing in for the agent and notification targets.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::upstream::agent::{AgentQuery, Schema};

/// Metadata an agent double serves.
#[derive(Debug, Clone)]
pub struct AgentFixture {
    pub did: Option<String>,
    pub schemas: Vec<Schema>,
    pub cred_defs: Vec<(String, Value)>,
}

impl AgentFixture {
    /// `cd1` → `sch1`, `cd2` → `sch2`, and `cd-orphan` pointing at no known schema.
    pub fn sample() -> Self {
        Self {
            did: Some("did:example:1".to_owned()),
            schemas: vec![schema("sch1", 15), schema("sch2", 20)],
            cred_defs: vec![
                cred_def("cd1", "15"),
                cred_def("cd2", "20"),
                cred_def("cd-orphan", "99"),
            ],
        }
    }
}

pub fn schema(id: &str, seq_no: u64) -> Schema {
    Schema {
        id: id.to_owned(),
        seq_no: Some(seq_no),
        name: Some(format!("{id}-name")),
        version: Some("1.0".to_owned()),
        attr_names: vec!["foo".to_owned()],
    }
}

pub fn cred_def(id: &str, schema_seq_no: &str) -> (String, Value) {
    (
        id.to_owned(),
        json!({ "id": id, "schemaId": schema_seq_no, "tag": "default", "type": "CL" }),
    )
}

// -- In-memory agent ----------------------------------------------------------

/// In-memory [`AgentQuery`] that counts every call.
pub struct FakeAgent {
    fixture: AgentFixture,
    delay: Duration,
    failing: AtomicBool,
    pub did_calls: AtomicU32,
    pub schema_list_calls: AtomicU32,
    pub schema_calls: AtomicU32,
    pub cred_def_list_calls: AtomicU32,
    pub cred_def_calls: AtomicU32,
}

impl FakeAgent {
    pub fn new(fixture: AgentFixture) -> Self {
        Self {
            fixture,
            delay: Duration::ZERO,
            failing: AtomicBool::new(false),
            did_calls: AtomicU32::new(0),
            schema_list_calls: AtomicU32::new(0),
            schema_calls: AtomicU32::new(0),
            cred_def_list_calls: AtomicU32::new(0),
            cred_def_calls: AtomicU32::new(0),
        }
    }

    /// Sleep this long inside every query, widening race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every query fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    async fn enter(&self, counter: &AtomicU32) -> anyhow::Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("agent offline");
        }
        Ok(())
    }
}

impl AgentQuery for FakeAgent {
    async fn public_did(&self) -> anyhow::Result<String> {
        self.enter(&self.did_calls).await?;
        self.fixture.did.clone().ok_or_else(|| anyhow::anyhow!("agent has no public DID"))
    }

    async fn schema_ids(&self) -> anyhow::Result<Vec<String>> {
        self.enter(&self.schema_list_calls).await?;
        Ok(self.fixture.schemas.iter().map(|s| s.id.clone()).collect())
    }

    async fn schema(&self, schema_id: &str) -> anyhow::Result<Schema> {
        self.enter(&self.schema_calls).await?;
        self.fixture
            .schemas
            .iter()
            .find(|s| s.id == schema_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("schema {schema_id} not found"))
    }

    async fn credential_definition_ids(&self) -> anyhow::Result<Vec<String>> {
        self.enter(&self.cred_def_list_calls).await?;
        Ok(self.fixture.cred_defs.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn credential_definition(&self, cred_def_id: &str) -> anyhow::Result<Value> {
        self.enter(&self.cred_def_calls).await?;
        self.fixture
            .cred_defs
            .iter()
            .find(|(id, _)| id == cred_def_id)
            .map(|(_, body)| body.clone())
            .ok_or_else(|| anyhow::anyhow!("credential definition {cred_def_id} not found"))
    }
}

// -- HTTP doubles -------------------------------------------------------------

/// A local server that answers the agent admin API from a fixture.
pub struct MockAgentServer {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicU32>,
}

impl MockAgentServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Spawn an agent admin API double on a random port.
pub async fn spawn_mock_agent(fixture: AgentFixture) -> anyhow::Result<MockAgentServer> {
    let fixture = Arc::new(fixture);
    let hits = Arc::new(AtomicU32::new(0));

    let did = {
        let (fixture, hits) = (Arc::clone(&fixture), Arc::clone(&hits));
        move || async move {
            hits.fetch_add(1, Ordering::SeqCst);
            match &fixture.did {
                Some(did) => Json(json!({ "result": { "did": did, "verkey": "vk" } })),
                None => Json(json!({ "result": null })),
            }
        }
    };
    let schema_ids = {
        let (fixture, hits) = (Arc::clone(&fixture), Arc::clone(&hits));
        move || async move {
            hits.fetch_add(1, Ordering::SeqCst);
            let ids: Vec<&str> = fixture.schemas.iter().map(|s| s.id.as_str()).collect();
            Json(json!({ "schema_ids": ids }))
        }
    };
    let schema_body = {
        let (fixture, hits) = (Arc::clone(&fixture), Arc::clone(&hits));
        move |Path(id): Path<String>| async move {
            hits.fetch_add(1, Ordering::SeqCst);
            match fixture.schemas.iter().find(|s| s.id == id) {
                Some(schema) => (StatusCode::OK, Json(json!({ "schema_json": schema }))),
                None => (StatusCode::NOT_FOUND, Json(json!({}))),
            }
        }
    };
    let cred_def_ids = {
        let (fixture, hits) = (Arc::clone(&fixture), Arc::clone(&hits));
        move || async move {
            hits.fetch_add(1, Ordering::SeqCst);
            let ids: Vec<&str> = fixture.cred_defs.iter().map(|(id, _)| id.as_str()).collect();
            Json(json!({ "credential_definition_ids": ids }))
        }
    };
    let cred_def_body = {
        let (fixture, hits) = (Arc::clone(&fixture), Arc::clone(&hits));
        move |Path(id): Path<String>| async move {
            hits.fetch_add(1, Ordering::SeqCst);
            match fixture.cred_defs.iter().find(|(cd, _)| *cd == id) {
                Some((_, body)) => {
                    (StatusCode::OK, Json(json!({ "credential_definition": body })))
                }
                None => (StatusCode::NOT_FOUND, Json(json!({}))),
            }
        }
    };

    let app = Router::new()
        .route("/wallet/did/public", get(did))
        .route("/schemas/created", get(schema_ids))
        .route("/schemas/{id}", get(schema_body))
        .route("/credential-definitions/created", get(cred_def_ids))
        .route("/credential-definitions/{id}", get(cred_def_body));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(MockAgentServer { addr, hits })
}

/// A request captured by a [`Recorder`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub body: Value,
}

/// A local server that records every JSON POST and answers with a fixed status.
pub struct Recorder {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn received(&self) -> Vec<Recorded> {
        self.received.lock().await.clone()
    }

    /// Poll until at least `count` requests arrived or `timeout` elapsed.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> anyhow::Result<Vec<Recorded>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let received = self.received().await;
            if received.len() >= count {
                return Ok(received);
            }
            if tokio::time::Instant::now() >= deadline {
                anyhow::bail!("expected {count} requests, got {}", received.len());
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Spawn a recording server on a random port.
pub async fn spawn_recorder(status: StatusCode) -> anyhow::Result<Recorder> {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let app = Router::new().fallback(move |uri: Uri, Json(body): Json<Value>| {
        let sink = Arc::clone(&sink);
        async move {
            sink.lock().await.push(Recorded { path: uri.path().to_owned(), body });
            (status, Json(json!({})))
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Recorder { addr, received })
}
