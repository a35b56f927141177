//! Integration tests for `DocumentEventStoreAdapter`.

use quire_core::Metadata;
use quire_core::adapter::EventStoreAdapter;
use quire_core::error::{MessageFactoryError, ValidationError};
use quire_core::message::DomainMessage;
use quire_core::messaging::{GenericMessageFactory, NoOpMessageConverter};
use quire_core::stream::Stream;
use quire_docstore::{Config, Document, Repository, StoreError};
use quire_event_store::{DecodeError, DocumentEventStoreAdapter, EventStoreError};
use quire_test_support::{
    DroppingMessageConverter, UserEvent, UserEventConverter, UserEventFactory, UserEventKind,
    UserRegistered, UserRenamed, domain_message, fixed_time, init_tracing, object, scratch_dir,
    stream_name,
};
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;

/// Helper to build an adapter over a fresh scratch directory.
fn make_adapter() -> (TempDir, DocumentEventStoreAdapter) {
    init_tracing();
    let dir = scratch_dir();
    let adapter = DocumentEventStoreAdapter::new(
        dir.path(),
        GenericMessageFactory,
        NoOpMessageConverter,
    );
    (dir, adapter)
}

fn versions(events: &[DomainMessage]) -> Vec<i64> {
    events.iter().map(DomainMessage::version).collect()
}

// --- empty streams ---

#[test]
fn test_load_returns_none_for_unknown_stream() {
    let (_dir, adapter) = make_adapter();

    let loaded = adapter.load(&stream_name("unknown"), None).unwrap();

    assert!(loaded.is_none());
}

#[test]
fn test_load_events_and_replay_return_empty_for_unknown_stream() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("unknown");

    let events = adapter.load_events(&name, &Metadata::new(), None).unwrap();
    let replayed = adapter.replay(&name, None, &Metadata::new()).unwrap();

    assert!(events.is_empty());
    assert!(replayed.is_empty());
}

#[test]
fn test_append_empty_batch_creates_nothing() {
    let (dir, adapter) = make_adapter();
    let name = stream_name("empty");

    adapter.append_to(&name, Vec::new()).unwrap();

    assert!(adapter.load(&name, None).unwrap().is_none());
    assert!(!dir.path().join("empty").exists());
}

// --- create + load round-trip ---

#[test]
fn test_create_and_load_round_trips_every_field() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("user-stream");
    let event = DomainMessage::from_parts(
        Uuid::new_v4(),
        1,
        "user.registered",
        object(json!({"name": "Ada", "tags": ["a", "b"], "nested": {"n": 1.5}})),
        object(json!({"tenant": "a", "causation": null})),
        fixed_time(123_456),
    );

    adapter
        .create(Stream::new(name.clone(), vec![event.clone()]))
        .unwrap();

    let stream = adapter.load(&name, None).unwrap().unwrap();
    assert_eq!(stream.stream_name(), &name);
    assert_eq!(stream.stream_events(), &[event.clone()]);
    assert_eq!(
        stream.stream_events()[0].created_at().timestamp_micros(),
        event.created_at().timestamp_micros()
    );
}

#[test]
fn test_records_are_written_in_the_documented_layout() {
    let (dir, adapter) = make_adapter();
    let name = stream_name("layout");
    let event = domain_message("order.placed", 3, fixed_time(42))
        .with_added_metadata("tenant", "a");

    adapter.append_to(&name, vec![event.clone()]).unwrap();

    let path = dir.path().join("layout").join(format!("{}.json", event.uuid()));
    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(stored["event_id"], json!(event.uuid().to_string()));
    assert_eq!(stored["version"], json!(3));
    assert_eq!(stored["event_name"], json!("order.placed"));
    assert_eq!(stored["payload"], json!({"seq": 3}));
    assert_eq!(stored["metadata"], json!({"tenant": "a"}));
    assert_eq!(stored["created_at"], json!("2026-01-15T10:00:00.000042"));
}

// --- ordering ---

#[test]
fn test_load_events_orders_by_version_not_append_order() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("ordering");
    let events = vec![
        domain_message("e", 3, fixed_time(0)),
        domain_message("e", 1, fixed_time(1)),
        domain_message("e", 2, fixed_time(2)),
    ];

    adapter.append_to(&name, events).unwrap();

    let loaded = adapter.load_events(&name, &Metadata::new(), None).unwrap();
    assert_eq!(versions(&loaded), [1, 2, 3]);
}

#[test]
fn test_replay_breaks_created_at_ties_by_version() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("ties");
    let at = fixed_time(500);

    adapter
        .append_to(
            &name,
            vec![domain_message("e", 5, at), domain_message("e", 2, at)],
        )
        .unwrap();

    let replayed = adapter.replay(&name, None, &Metadata::new()).unwrap();
    assert_eq!(versions(&replayed), [2, 5]);
}

#[test]
fn test_replay_orders_by_created_at_before_version() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("time-order");

    adapter
        .append_to(
            &name,
            vec![
                domain_message("e", 1, fixed_time(3_000_000)),
                domain_message("e", 2, fixed_time(1)),
                domain_message("e", 3, fixed_time(2)),
            ],
        )
        .unwrap();

    let replayed = adapter.replay(&name, None, &Metadata::new()).unwrap();
    let loaded = adapter.load_events(&name, &Metadata::new(), None).unwrap();
    assert_eq!(versions(&replayed), [2, 3, 1]);
    assert_eq!(versions(&loaded), [1, 2, 3]);
}

// --- filtering ---

#[test]
fn test_load_events_filters_by_metadata() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("tenants");
    let tenant_a = domain_message("e", 1, fixed_time(0)).with_added_metadata("tenant", "a");
    let tenant_b = domain_message("e", 2, fixed_time(1)).with_added_metadata("tenant", "b");

    adapter
        .append_to(&name, vec![tenant_a.clone(), tenant_b])
        .unwrap();

    let loaded = adapter
        .load_events(&name, &object(json!({"tenant": "a"})), None)
        .unwrap();
    assert_eq!(loaded, [tenant_a]);
}

#[test]
fn test_metadata_filters_are_conjunctive() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("conjunctive");
    let both = domain_message("e", 1, fixed_time(0))
        .with_added_metadata("tenant", "a")
        .with_added_metadata("region", "eu");
    let tenant_only = domain_message("e", 2, fixed_time(1)).with_added_metadata("tenant", "a");

    adapter.append_to(&name, vec![both.clone(), tenant_only]).unwrap();

    let loaded = adapter
        .load_events(&name, &object(json!({"tenant": "a", "region": "eu"})), None)
        .unwrap();
    assert_eq!(loaded, [both]);
}

#[test]
fn test_load_events_applies_min_version() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("min-version");
    let events = (1..=5)
        .map(|v| domain_message("e", v, fixed_time(v)))
        .collect();

    adapter.append_to(&name, events).unwrap();

    let loaded = adapter.load_events(&name, &Metadata::new(), Some(3)).unwrap();
    assert_eq!(versions(&loaded), [3, 4, 5]);
}

#[test]
fn test_load_with_min_version_past_the_end_returns_none() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("short");

    adapter
        .append_to(&name, vec![domain_message("e", 1, fixed_time(0))])
        .unwrap();

    assert!(adapter.load(&name, Some(2)).unwrap().is_none());
    assert_eq!(
        versions(adapter.load(&name, Some(1)).unwrap().unwrap().stream_events()),
        [1]
    );
}

#[test]
fn test_replay_since_is_an_inclusive_lower_bound() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("since");

    adapter
        .append_to(
            &name,
            vec![
                domain_message("e", 1, fixed_time(99)),
                domain_message("e", 2, fixed_time(100)),
                domain_message("e", 3, fixed_time(101)),
            ],
        )
        .unwrap();

    let replayed = adapter
        .replay(&name, Some(fixed_time(100)), &Metadata::new())
        .unwrap();
    assert_eq!(versions(&replayed), [2, 3]);
}

#[test]
fn test_replay_combines_since_and_metadata() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("replay-filter");

    adapter
        .append_to(
            &name,
            vec![
                domain_message("e", 1, fixed_time(0)).with_added_metadata("tenant", "a"),
                domain_message("e", 2, fixed_time(10)).with_added_metadata("tenant", "b"),
                domain_message("e", 3, fixed_time(20)).with_added_metadata("tenant", "a"),
            ],
        )
        .unwrap();

    let replayed = adapter
        .replay(&name, Some(fixed_time(5)), &object(json!({"tenant": "a"})))
        .unwrap();
    assert_eq!(versions(&replayed), [3]);
}

// --- stream isolation ---

#[test]
fn test_streams_do_not_see_each_other() {
    let (_dir, adapter) = make_adapter();
    let a = stream_name("stream-a");
    let b = stream_name("stream-b");

    adapter
        .append_to(&a, vec![domain_message("e", 1, fixed_time(0))])
        .unwrap();
    adapter
        .append_to(
            &b,
            vec![
                domain_message("e", 1, fixed_time(0)),
                domain_message("e", 2, fixed_time(1)),
            ],
        )
        .unwrap();

    assert_eq!(adapter.load_events(&a, &Metadata::new(), None).unwrap().len(), 1);
    assert_eq!(adapter.load_events(&b, &Metadata::new(), None).unwrap().len(), 2);
}

// --- versions are not checked ---

#[test]
fn test_duplicate_versions_with_distinct_uuids_are_kept() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("dup-versions");

    adapter
        .append_to(
            &name,
            vec![
                domain_message("e", 1, fixed_time(0)),
                domain_message("e", 1, fixed_time(1)),
                domain_message("e", 4, fixed_time(2)),
            ],
        )
        .unwrap();

    let loaded = adapter.load_events(&name, &Metadata::new(), None).unwrap();
    assert_eq!(versions(&loaded), [1, 1, 4]);
}

// --- write failures ---

#[test]
fn test_duplicate_uuid_stops_the_batch_and_keeps_earlier_events() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("partial");
    let first = domain_message("e", 1, fixed_time(0));
    let second = domain_message("e", 2, fixed_time(1));
    let collision = domain_message("e", 3, fixed_time(2)).with_uuid(first.uuid());
    let never_written = domain_message("e", 4, fixed_time(3));

    let result = adapter.append_to(
        &name,
        vec![first.clone(), second.clone(), collision, never_written],
    );

    match result {
        Err(EventStoreError::Store(StoreError::DuplicateKey { id, collection })) => {
            assert_eq!(id, first.uuid().to_string());
            assert_eq!(collection, "partial");
        }
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
    let loaded = adapter.load_events(&name, &Metadata::new(), None).unwrap();
    assert_eq!(loaded, [first, second]);
}

#[test]
fn test_missing_field_fails_validation_and_writes_nothing() {
    init_tracing();
    let dir = scratch_dir();
    let adapter = DocumentEventStoreAdapter::new(
        dir.path(),
        GenericMessageFactory,
        DroppingMessageConverter::new("created_at"),
    );
    let name = stream_name("invalid");

    let result = adapter.append_to(&name, vec![domain_message("e", 1, fixed_time(0))]);

    assert!(matches!(
        result,
        Err(EventStoreError::Validation(ValidationError::MissingField {
            field: "created_at"
        }))
    ));
    assert!(adapter.load(&name, None).unwrap().is_none());
}

#[test]
fn test_invalid_stream_name_surfaces_store_error() {
    let (_dir, adapter) = make_adapter();
    let name = stream_name("has/slash");

    let write = adapter.append_to(&name, vec![domain_message("e", 1, fixed_time(0))]);
    let read = adapter.load_events(&name, &Metadata::new(), None);

    assert!(matches!(
        write,
        Err(EventStoreError::Store(StoreError::InvalidCollectionName(_)))
    ));
    assert!(matches!(
        read,
        Err(EventStoreError::Store(StoreError::InvalidCollectionName(_)))
    ));
}

// --- malformed records ---

#[test]
fn test_malformed_created_at_fails_load_events_with_decode_error() {
    let (dir, adapter) = make_adapter();
    let name = stream_name("corrupt");
    adapter
        .append_to(&name, vec![domain_message("e", 1, fixed_time(0))])
        .unwrap();
    let repository = Repository::new("corrupt", &Config::new(dir.path())).unwrap();
    repository
        .store(&Document::new(
            "bad-record",
            object(json!({
                "event_id": Uuid::new_v4().to_string(),
                "version": 2,
                "event_name": "e",
                "payload": {},
                "metadata": {},
                "created_at": "not-a-date"
            })),
        ))
        .unwrap();

    let result = adapter.load_events(&name, &Metadata::new(), None);

    match result {
        Err(EventStoreError::Decode(DecodeError::InvalidCreatedAt { value, .. })) => {
            assert_eq!(value, "not-a-date");
        }
        other => panic!("expected InvalidCreatedAt, got {other:?}"),
    }
    assert!(matches!(
        adapter.replay(&name, None, &Metadata::new()),
        Err(EventStoreError::Decode(_))
    ));
}

#[test]
fn test_string_version_fails_load_events_with_decode_error() {
    let (dir, adapter) = make_adapter();
    let name = stream_name("string-version");
    adapter
        .append_to(&name, vec![domain_message("e", 5, fixed_time(0))])
        .unwrap();
    let repository = Repository::new("string-version", &Config::new(dir.path())).unwrap();
    repository
        .store(&Document::new(
            "stringly",
            object(json!({
                "event_id": Uuid::new_v4().to_string(),
                "version": "2",
                "event_name": "e",
                "payload": {},
                "metadata": {},
                "created_at": "2026-01-15T10:00:00.000001"
            })),
        ))
        .unwrap();

    let result = adapter.load_events(&name, &Metadata::new(), None);

    assert!(matches!(
        result,
        Err(EventStoreError::Decode(DecodeError::InvalidField { field: "version", .. }))
    ));
}

// --- typed messages ---

type UserAdapter = DocumentEventStoreAdapter<UserEvent, UserEventFactory, UserEventConverter>;

fn user_adapter(dir: &TempDir) -> UserAdapter {
    DocumentEventStoreAdapter::new(dir.path(), UserEventFactory, UserEventConverter)
}

#[test]
fn test_typed_events_are_rebuilt_from_their_event_name() {
    init_tracing();
    let dir = scratch_dir();
    let adapter = user_adapter(&dir);
    let name = stream_name("users");
    let registered = UserEvent {
        uuid: Uuid::new_v4(),
        version: 1,
        created_at: fixed_time(0),
        metadata: object(json!({"tenant": "a"})),
        kind: UserEventKind::Registered(UserRegistered {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
        }),
    };
    let renamed = UserEvent {
        uuid: Uuid::new_v4(),
        version: 2,
        created_at: fixed_time(1),
        metadata: Metadata::new(),
        kind: UserEventKind::Renamed(UserRenamed {
            name: "Ada L.".to_owned(),
        }),
    };

    adapter
        .create(Stream::new(name.clone(), vec![registered.clone(), renamed.clone()]))
        .unwrap();

    let loaded = adapter.load_events(&name, &Metadata::new(), None).unwrap();
    assert_eq!(loaded, [registered, renamed]);
}

#[test]
fn test_unknown_event_name_fails_with_factory_error() {
    init_tracing();
    let dir = scratch_dir();
    let generic = DocumentEventStoreAdapter::new(
        dir.path(),
        GenericMessageFactory,
        NoOpMessageConverter,
    );
    let typed = user_adapter(&dir);
    let name = stream_name("users");
    generic
        .append_to(&name, vec![domain_message("user.deleted", 1, fixed_time(0))])
        .unwrap();

    let result = typed.load_events(&name, &Metadata::new(), None);

    assert!(matches!(
        result,
        Err(EventStoreError::MessageFactory(MessageFactoryError::UnknownMessageName(n)))
            if n == "user.deleted"
    ));
}
