//! Record-type descriptors.
//!
//! A [`Resource`] describes one soft-deletable table: its name, the domain
//! fields callers must supply, the row type read back, and how a validated
//! field set is bound into SQL. Stores, the lifecycle controller, routes and
//! OpenAPI fragments are all derived from it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

/// Storage and wire type of a domain field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    /// Calendar date kept as text (`YYYY-MM-DD`), not parsed.
    Date,
}

/// One required domain field of a resource.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

/// A bindable field value, in [`Resource::FIELDS`] order.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

/// Lifecycle discriminator derived from `is_deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Active,
    Deleted,
}

impl RecordState {
    pub fn from_deleted_flag(is_deleted: bool) -> Self {
        if is_deleted {
            RecordState::Deleted
        } else {
            RecordState::Active
        }
    }
}

/// A persisted row: store-assigned id, domain fields, deleted flag.
pub trait Record:
    Serialize + Send + Sync + Unpin + 'static + for<'r> FromRow<'r, SqliteRow>
{
    fn id(&self) -> i64;

    fn is_deleted(&self) -> bool;

    fn state(&self) -> RecordState {
        RecordState::from_deleted_flag(self.is_deleted())
    }
}

/// Descriptor for a soft-deletable record type.
pub trait Resource: Send + Sync + 'static {
    /// Table name; also the plural JSON key and mount path.
    const TABLE: &'static str;

    /// JSON key wrapping a single record (`"author"`).
    const SINGULAR: &'static str;

    /// Human-readable name used in messages (`"Author"`).
    const LABEL: &'static str;

    /// Required domain fields, in column order.
    const FIELDS: &'static [FieldSpec];

    type Record: Record;

    /// Validated field set decoded from a request body.
    type Fields: DeserializeOwned + Send + Sync;

    /// Values of `fields`, one per entry of [`Self::FIELDS`] and in the same order.
    fn values(fields: &Self::Fields) -> Vec<FieldValue>;
}
