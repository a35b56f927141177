//! Composition of stream read queries.
//!
//! These functions only describe a read; the collection executes it.

use chrono::{DateTime, Utc};
use quire_core::Metadata;
use quire_docstore::{FieldPath, Operator, OrderBy, Query};

use crate::codec::{CREATED_AT, METADATA, VERSION, format_created_at};

/// Query for `load_events`: metadata equality, optional version lower bound,
/// ordered by version.
#[must_use]
pub fn load_events_query(metadata: &Metadata, min_version: Option<i64>) -> Query {
    let mut query = metadata_filters(metadata);
    if let Some(min_version) = min_version {
        query = query.filter(VERSION, Operator::Gte, min_version);
    }
    query.order_by(OrderBy::asc(VERSION))
}

/// Query for `replay`: metadata equality, optional inclusive creation-time
/// lower bound, ordered by creation time then version.
#[must_use]
pub fn replay_query(metadata: &Metadata, since: Option<DateTime<Utc>>) -> Query {
    let mut query = metadata_filters(metadata);
    if let Some(since) = since {
        query = query.filter(CREATED_AT, Operator::Gte, format_created_at(since));
    }
    query
        .order_by(OrderBy::asc(CREATED_AT))
        .order_by(OrderBy::asc(VERSION))
}

/// One `metadata.<key> == value` clause per entry. The key is a single
/// path segment even when it contains dots.
fn metadata_filters(metadata: &Metadata) -> Query {
    metadata.iter().fold(Query::new(), |query, (key, value)| {
        query.filter(
            FieldPath::new([METADATA, key.as_str()]),
            Operator::Eq,
            value.clone(),
        )
    })
}
