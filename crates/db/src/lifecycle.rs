//! Soft-delete lifecycle controller.
//!
//! Records move between two states, `Active` and `Deleted`, driven only by the
//! `is_deleted` flag. Nothing is ever physically removed:
//!
//! ```text
//!            delete
//!   Active ---------> Deleted
//!          <---------
//!            restore
//! ```
//!
//! Existence means different things per operation. `get` and `delete` only
//! see active records, while `update` and `restore` see every row with the id.
//! Deleted records therefore stay editable through `update`.

use crate::error::{LifecycleError, LifecycleResult, StoreError};
use crate::pool::Database;
use crate::resource::{Record, RecordState, Resource};
use crate::store::ResourceStore;
use serde_json::Value;
use std::sync::Arc;

/// Lifecycle controller for one record type.
pub struct Lifecycle<R: Resource> {
    store: Arc<dyn ResourceStore<R>>,
}

impl<R: Resource> Clone for Lifecycle<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: Resource> Lifecycle<R> {
    pub fn new(store: Arc<dyn ResourceStore<R>>) -> Self {
        Self { store }
    }

    /// Controller backed by the SQLite store for `R` on the given database.
    pub fn from_database(db: &Database) -> Self {
        Self::new(Arc::new(db.store::<R>()))
    }

    pub fn store(&self) -> &Arc<dyn ResourceStore<R>> {
        &self.store
    }

    /// Insert a new active record and return its id.
    pub async fn create(&self, payload: &Value) -> LifecycleResult<i64> {
        let fields = parse_fields::<R>(payload)?;
        let id = self
            .store
            .insert(&fields)
            .await
            .map_err(|e| store_failure::<R>("create", None, e))?;

        tracing::debug!(resource = R::TABLE, id, "record created");
        Ok(id)
    }

    /// Fetch an active record.
    pub async fn get(&self, id: i64) -> LifecycleResult<R::Record> {
        self.store
            .find_active(id)
            .await
            .map_err(|e| store_failure::<R>("get", Some(id), e))?
            .ok_or_else(|| not_found::<R>(id))
    }

    /// All active records in ascending id order.
    pub async fn list(&self) -> LifecycleResult<Vec<R::Record>> {
        self.store
            .list_active()
            .await
            .map_err(|e| store_failure::<R>("list", None, e))
    }

    /// Overwrite the domain fields of any record with this id, deleted or not.
    pub async fn update(&self, id: i64, payload: &Value) -> LifecycleResult<R::Record> {
        let fields = parse_fields::<R>(payload)?;
        let record = self
            .store
            .replace_fields(id, &fields)
            .await
            .map_err(|e| store_failure::<R>("update", Some(id), e))?
            .ok_or_else(|| not_found::<R>(id))?;

        tracing::debug!(
            resource = R::TABLE,
            id = record.id(),
            deleted = record.state() == RecordState::Deleted,
            "record updated"
        );
        Ok(record)
    }

    /// Move an active record to `Deleted`.
    pub async fn delete(&self, id: i64) -> LifecycleResult<()> {
        let changed = self
            .store
            .set_deleted_flag(id, true)
            .await
            .map_err(|e| store_failure::<R>("delete", Some(id), e))?;

        if !changed {
            return Err(not_found::<R>(id));
        }

        tracing::debug!(resource = R::TABLE, id, "record deleted");
        Ok(())
    }

    /// Move a deleted record back to `Active`.
    pub async fn restore(&self, id: i64) -> LifecycleResult<()> {
        let changed = self
            .store
            .set_deleted_flag(id, false)
            .await
            .map_err(|e| store_failure::<R>("restore", Some(id), e))?;

        if changed {
            tracing::debug!(resource = R::TABLE, id, "record restored");
            return Ok(());
        }

        // Zero rows changed: the row was either missing or active at write
        // time. A row found now was active then, whatever its state is now.
        let existing = self
            .store
            .find_any(id)
            .await
            .map_err(|e| store_failure::<R>("restore", Some(id), e))?;

        match existing {
            Some(_) => Err(LifecycleError::AlreadyActive {
                resource: R::LABEL,
                id,
            }),
            None => Err(not_found::<R>(id)),
        }
    }
}

/// Check that every required field is present and decode the field set.
///
/// A field holding `null` counts as missing. Presence is checked for all
/// fields before any type is looked at.
pub fn parse_fields<R: Resource>(payload: &Value) -> LifecycleResult<R::Fields> {
    let missing: Vec<&'static str> = match payload.as_object() {
        Some(object) => R::FIELDS
            .iter()
            .filter(|field| object.get(field.name).map_or(true, Value::is_null))
            .map(|field| field.name)
            .collect(),
        None => R::FIELDS.iter().map(|field| field.name).collect(),
    };

    if !missing.is_empty() {
        return Err(LifecycleError::MissingFields(missing));
    }

    serde_json::from_value(payload.clone())
        .map_err(|e| LifecycleError::InvalidFields(e.to_string()))
}

fn not_found<R: Resource>(id: i64) -> LifecycleError {
    LifecycleError::NotFound {
        resource: R::LABEL,
        id,
    }
}

fn store_failure<R: Resource>(
    operation: &'static str,
    id: Option<i64>,
    error: StoreError,
) -> LifecycleError {
    tracing::error!(
        resource = R::TABLE,
        operation,
        id = ?id,
        error = %error,
        "store operation failed"
    );
    LifecycleError::Store(error)
}
