//! Message builders and scratch storage for tests.

use std::sync::Once;

use chrono::{DateTime, Utc};
use quire_core::Metadata;
use quire_core::message::DomainMessage;
use quire_core::stream::StreamName;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use crate::clock::FixedClock;

/// Unwraps a `json!` object literal into a key-value map.
///
/// # Panics
///
/// Panics if `value` is not a JSON object.
#[must_use]
pub fn object(value: serde_json::Value) -> Metadata {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A `DomainMessage` with the given name, version and timestamp, a
/// `{"seq": version}` payload and no metadata.
#[must_use]
pub fn domain_message(name: &str, version: i64, created_at: DateTime<Utc>) -> DomainMessage {
    let payload = object(serde_json::json!({ "seq": version }));
    DomainMessage::new(name, payload, &FixedClock(created_at)).with_version(version)
}

/// Parses a stream name.
///
/// # Panics
///
/// Panics if `name` is empty.
#[must_use]
pub fn stream_name(name: &str) -> StreamName {
    StreamName::new(name).expect("test stream names are non-empty")
}

/// A fresh temporary directory, removed when dropped.
///
/// # Panics
///
/// Panics if the directory cannot be created.
#[must_use]
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().expect("temporary directory")
}

static TRACING: Once = Once::new();

/// Installs a test log subscriber once per process. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}
