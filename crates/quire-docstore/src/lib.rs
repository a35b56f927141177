//! Quire Docstore: a flat-file JSON document store.
//!
//! Documents live under `<root>/<collection>/<id>.json`, one file each.
//! A [`Repository`] is a handle on one collection: it stores documents and
//! executes [`Query`] values made of equality/lower-bound predicates over
//! dotted field paths plus a multi-key ordering.
//!
//! Collections are created lazily by the first write. Nothing is cached:
//! every query reads the collection directory afresh.

pub mod config;
pub mod document;
pub mod error;
pub mod query;
pub mod repository;

pub use config::Config;
pub use document::{Document, FieldPath};
pub use error::StoreError;
pub use query::{Direction, Operator, OrderBy, Predicate, Query};
pub use repository::Repository;
