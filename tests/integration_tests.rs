//! Integration tests for FlowWatch ingestion, listing and resolution

use std::sync::Arc;

use flowwatch::{
    EventFilter, EventStore, FlowWatchError, IngestService, IngestToken, NewEvent, Page,
    QueryService,
};
use serde_json::json;

const TOKEN: &str = "integration-secret";

fn setup() -> (IngestService, QueryService) {
    let store = Arc::new(EventStore::in_memory());
    (
        IngestService::new(store.clone(), IngestToken::new(TOKEN)),
        QueryService::new(store),
    )
}

#[test]
fn test_end_to_end_triage() {
    let (ingest, query) = setup();

    let id = ingest
        .ingest(
            Some(TOKEN),
            NewEvent::with_message("timeout calling API").workflow("wf-1", "Sync Orders"),
        )
        .unwrap()
        .id;
    ingest
        .ingest(
            Some(TOKEN),
            NewEvent::with_message("bad credentials").workflow("wf-2", "Billing"),
        )
        .unwrap();

    let by_name = query.list_events(&EventFilter::new().workflow_name(Some("sync")), Page::default());
    assert_eq!(by_name.total, 1);
    assert_eq!(by_name.events.len(), 1);
    assert_eq!(by_name.events[0].id, id);

    query.resolve_event(id).unwrap();

    let resolved = query.list_events(&EventFilter::new().resolved(Some(true)), Page::default());
    assert!(resolved.events.iter().any(|e| e.id == id));

    let open = query.list_events(&EventFilter::new().resolved(Some(false)), Page::default());
    assert!(open.events.iter().all(|e| e.id != id));
    assert_eq!(open.total, 1);
}

#[test]
fn test_ingested_fields_round_trip() {
    let (ingest, query) = setup();
    let payload = json!({
        "execution": {"id": "1234", "mode": "trigger"},
        "items": [{"json": {"sku": "A-1", "qty": 3}}],
        "note": null
    });

    let candidate = NewEvent::with_message("Cannot read properties of undefined")
        .workflow("wf-42", "Nightly Export")
        .node("Code")
        .stack("TypeError: Cannot read properties of undefined\n    at main (Code:3:7)")
        .run("1234", 2)
        .payload(payload.clone());

    let id = ingest.ingest(Some(TOKEN), candidate.clone()).unwrap().id;
    let event = query.get_event(id).unwrap();

    assert_eq!(event.workflow_id, candidate.workflow_id);
    assert_eq!(event.workflow_name, candidate.workflow_name);
    assert_eq!(event.node, candidate.node);
    assert_eq!(Some(event.error_message.clone()), candidate.error_message);
    assert_eq!(event.error_stack, candidate.error_stack);
    assert_eq!(event.run_id, candidate.run_id);
    assert_eq!(event.attempt, 2);
    assert_eq!(event.payload.unwrap().into_value(), payload);
    assert!(!event.resolved);
    assert!(event.resolved_at.is_none());
}

#[test]
fn test_free_text_matches_stack_only_events() {
    let (ingest, query) = setup();
    let in_message = ingest
        .ingest(Some(TOKEN), NewEvent::with_message("Gateway Timeout from upstream"))
        .unwrap()
        .id;
    let in_stack = ingest
        .ingest(
            Some(TOKEN),
            NewEvent::with_message("request failed").stack("Error: ETIMEDOUT timeout after 30s"),
        )
        .unwrap()
        .id;
    ingest
        .ingest(Some(TOKEN), NewEvent::with_message("unrelated"))
        .unwrap();

    let found = query.list_events(&EventFilter::new().text(Some("timeout")), Page::default());
    let mut ids: Vec<u64> = found.events.iter().map(|e| e.id).collect();
    ids.sort();
    assert_eq!(ids, vec![in_message, in_stack]);
}

#[test]
fn test_rejections_store_nothing() {
    let (ingest, query) = setup();

    assert!(matches!(
        ingest.ingest(Some(TOKEN), NewEvent::default()),
        Err(FlowWatchError::Validation(_))
    ));
    assert!(matches!(
        ingest.ingest(Some("wrong"), NewEvent::with_message("boom")),
        Err(FlowWatchError::Unauthorized)
    ));

    assert_eq!(query.list_events(&EventFilter::new(), Page::default()).total, 0);
}

#[test]
fn test_resolve_unknown_event() {
    let (_ingest, query) = setup();
    assert!(matches!(query.resolve_event(1), Err(FlowWatchError::NotFound(1))));
}
