// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Mutex;

use super::*;

/// Handler set that records which method ran and with which state.
#[derive(Default)]
struct Recording {
    calls: Mutex<Vec<String>>,
}

impl Recording {
    fn record(&self, call: String) -> Value {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        json!({ "handled": true })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl TopicHandlers for Recording {
    fn connections(&self, state: &str, _message: &Value) -> Value {
        self.record(format!("connections:{state}"))
    }

    fn credentials(&self, state: &str, _message: &Value) -> Value {
        self.record(format!("credentials:{state}"))
    }

    fn presentations(&self, state: &str, _message: &Value) -> Value {
        self.record(format!("presentations:{state}"))
    }

    fn get_active_menu(&self, _message: &Value) -> Value {
        self.record("get_active_menu".to_owned())
    }

    fn perform_menu_action(&self, _message: &Value) -> Value {
        self.record("perform_menu_action".to_owned())
    }

    fn issuer_registration(&self, _message: &Value) -> Value {
        self.record("issuer_registration".to_owned())
    }

    fn problem_report(&self, _message: &Value) -> Value {
        self.record("problem_report".to_owned())
    }
}

#[test]
fn credentials_with_state_reaches_sub_handler() -> anyhow::Result<()> {
    let handlers = Recording::default();
    let reply = dispatch(&handlers, "credentials", &json!({ "state": "issued" }))?;
    assert_eq!(reply, json!({ "handled": true }));
    assert_eq!(handlers.calls(), vec!["credentials:issued".to_owned()]);
    Ok(())
}

#[test]
fn unknown_topic_is_rejected_by_name() {
    let handlers = Recording::default();
    let err = dispatch(&handlers, "bogus", &json!({ "state": "issued" })).err();
    assert_eq!(err, Some(ControllerError::UnknownTopic("bogus".to_owned())));
    assert!(err.map(|e| e.to_string()).unwrap_or_default().contains("bogus"));
    assert!(handlers.calls().is_empty());
}

#[yare::parameterized(
    connections = { "connections", "connections:active" },
    credentials = { "credentials", "credentials:active" },
    presentations = { "presentations", "presentations:active" },
    get_active_menu = { "get_active_menu", "get_active_menu" },
    perform_menu_action = { "perform_menu_action", "perform_menu_action" },
    issuer_registration = { "issuer_registration", "issuer_registration" },
    problem_report = { "problem_report", "problem_report" },
)]
fn stateful_events_reach_their_handler(topic: &str, expected: &str) {
    let handlers = Recording::default();
    let reply = dispatch(&handlers, topic, &json!({ "state": "active" }));
    assert_eq!(reply.ok(), Some(json!({ "handled": true })));
    assert_eq!(handlers.calls(), vec![expected.to_owned()]);
}

#[yare::parameterized(
    connections = { "connections" },
    credentials = { "credentials" },
    presentations = { "presentations" },
)]
fn state_gated_topics_ack_without_state(topic: &str) {
    let handlers = Recording::default();
    let reply = dispatch(&handlers, topic, &json!({ "connection_id": "c1" }));
    assert_eq!(reply.ok(), Some(ack()));
    assert!(handlers.calls().is_empty());
}

#[test]
fn connections_activity_never_inspects_state() -> anyhow::Result<()> {
    let handlers = Recording::default();
    let reply = dispatch(&handlers, "connections_activity", &json!({ "state": "active" }))?;
    assert_eq!(reply, ack());
    assert!(handlers.calls().is_empty());
    Ok(())
}

#[test]
fn ungated_topics_dispatch_without_state() -> anyhow::Result<()> {
    let handlers = Recording::default();
    dispatch(&handlers, "problem_report", &json!({ "explain-ltxt": "boom" }))?;
    dispatch(&handlers, "get_active_menu", &json!({}))?;
    assert_eq!(handlers.calls(), vec!["problem_report".to_owned(), "get_active_menu".to_owned()]);
    Ok(())
}

#[test]
fn anonymous_and_issuer_sets_acknowledge_every_topic() -> anyhow::Result<()> {
    for set in [HandlerSet::Anonymous, HandlerSet::Issuer] {
        let handlers = set.build();
        for topic in Topic::ALL {
            let reply = dispatch(handlers.as_ref(), topic.as_str(), &json!({ "state": "x" }))?;
            assert_eq!(reply, ack(), "{set} / {topic}");
        }
    }
    Ok(())
}

#[test]
fn topic_round_trips_through_its_name() -> anyhow::Result<()> {
    for topic in Topic::ALL {
        assert_eq!(topic.as_str().parse::<Topic>()?, topic);
    }
    assert!("Credentials".parse::<Topic>().is_err());
    Ok(())
}

#[test]
fn handler_set_parses_aliases() -> anyhow::Result<()> {
    assert_eq!("issuer".parse::<HandlerSet>()?, HandlerSet::Issuer);
    assert_eq!("ANON".parse::<HandlerSet>()?, HandlerSet::Anonymous);
    assert!("full".parse::<HandlerSet>().is_err());
    Ok(())
}
