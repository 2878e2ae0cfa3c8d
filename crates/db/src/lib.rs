//! Relational persistence for the bookstore service.
//!
//! This crate provides:
//! - [`Database`]: the pooled SQLite handle injected into every store
//! - [`Resource`]: the record-type descriptor (table, fields, row type)
//! - [`ResourceStore`]: per-type persistence, backed by [`SqliteResourceStore`]
//! - [`Lifecycle`]: the soft-delete state machine shared by all record types

pub mod error;
pub mod lifecycle;
pub mod pool;
pub mod resource;
pub mod store;

pub use error::{LifecycleError, LifecycleResult, StoreError, StoreResult};
pub use lifecycle::Lifecycle;
pub use pool::Database;
pub use resource::{FieldKind, FieldSpec, FieldValue, Record, RecordState, Resource};
pub use store::{RecordCounts, ResourceStore, SqliteResourceStore};
