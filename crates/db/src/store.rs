//! Resource store trait and its SQLite implementation.

use crate::error::StoreResult;
use crate::resource::{FieldValue, Resource};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqlitePool};
use sqlx::Sqlite;
use std::marker::PhantomData;

/// Active and deleted row totals for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub active: i64,
    pub deleted: i64,
}

/// Persistence operations for one record type.
///
/// Every method is a single statement; none of them spans a transaction.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// Get a record by ID, only if it is not deleted.
    async fn find_active(&self, id: i64) -> StoreResult<Option<R::Record>>;

    /// Get a record by ID regardless of its deleted flag.
    async fn find_any(&self, id: i64) -> StoreResult<Option<R::Record>>;

    /// List all non-deleted records in ascending ID order.
    async fn list_active(&self) -> StoreResult<Vec<R::Record>>;

    /// Insert a new active record and return its assigned ID.
    async fn insert(&self, fields: &R::Fields) -> StoreResult<i64>;

    /// Overwrite the domain fields of a record, deleted or not.
    /// Returns the updated row, or `None` when no row has this ID.
    async fn replace_fields(&self, id: i64, fields: &R::Fields) -> StoreResult<Option<R::Record>>;

    /// Set the deleted flag only if it currently holds the opposite value.
    /// Returns whether the row changed state.
    async fn set_deleted_flag(&self, id: i64, deleted: bool) -> StoreResult<bool>;

    /// Count active and deleted rows.
    async fn counts(&self) -> StoreResult<RecordCounts>;
}

/// SQL text for one table, rendered once from the descriptor.
#[derive(Debug, Clone)]
struct Statements {
    find_active: String,
    find_any: String,
    list_active: String,
    insert: String,
    replace_fields: String,
    set_deleted_flag: String,
    counts: String,
}

impl Statements {
    fn render<R: Resource>() -> Self {
        let table = R::TABLE;
        let names: Vec<&str> = R::FIELDS.iter().map(|field| field.name).collect();
        let columns = format!("id, {}, is_deleted", names.join(", "));
        let placeholders = vec!["?"; names.len()].join(", ");
        let assignments = names
            .iter()
            .map(|name| format!("{} = ?", name))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            find_active: format!(
                "SELECT {columns} FROM {table} WHERE id = ? AND is_deleted = 0"
            ),
            find_any: format!("SELECT {columns} FROM {table} WHERE id = ?"),
            list_active: format!(
                "SELECT {columns} FROM {table} WHERE is_deleted = 0 ORDER BY id"
            ),
            insert: format!(
                "INSERT INTO {table} ({}) VALUES ({placeholders}) RETURNING id",
                names.join(", ")
            ),
            replace_fields: format!(
                "UPDATE {table} SET {assignments} WHERE id = ? RETURNING {columns}"
            ),
            set_deleted_flag: format!(
                "UPDATE {table} SET is_deleted = ? WHERE id = ? AND is_deleted = ?"
            ),
            counts: format!(
                "SELECT \
                 COALESCE(SUM(CASE WHEN is_deleted = 0 THEN 1 ELSE 0 END), 0), \
                 COALESCE(SUM(CASE WHEN is_deleted = 0 THEN 0 ELSE 1 END), 0) \
                 FROM {table}"
            ),
        }
    }
}

/// SQLite-backed store for one resource type.
pub struct SqliteResourceStore<R: Resource> {
    pool: SqlitePool,
    sql: Statements,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> SqliteResourceStore<R> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            sql: Statements::render::<R>(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Clone for SqliteResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            sql: self.sql.clone(),
            _resource: PhantomData,
        }
    }
}

/// Bind field values in descriptor order.
fn bind_values<'q, O>(
    mut query: sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    values: Vec<FieldValue>,
) -> sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for value in values {
        query = match value {
            FieldValue::Text(text) => query.bind(text),
            FieldValue::Integer(number) => query.bind(number),
        };
    }
    query
}

fn field_values<R: Resource>(fields: &R::Fields) -> Vec<FieldValue> {
    let values = R::values(fields);
    debug_assert_eq!(
        values.len(),
        R::FIELDS.len(),
        "{} descriptor yields a value per field",
        R::TABLE
    );
    values
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for SqliteResourceStore<R> {
    async fn find_active(&self, id: i64) -> StoreResult<Option<R::Record>> {
        let row = sqlx::query_as::<_, R::Record>(&self.sql.find_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_any(&self, id: i64) -> StoreResult<Option<R::Record>> {
        let row = sqlx::query_as::<_, R::Record>(&self.sql.find_any)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_active(&self) -> StoreResult<Vec<R::Record>> {
        let rows = sqlx::query_as::<_, R::Record>(&self.sql.list_active)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, fields: &R::Fields) -> StoreResult<i64> {
        let query = sqlx::query_as::<_, (i64,)>(&self.sql.insert);
        let (id,) = bind_values(query, field_values::<R>(fields))
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn replace_fields(&self, id: i64, fields: &R::Fields) -> StoreResult<Option<R::Record>> {
        let query = sqlx::query_as::<_, R::Record>(&self.sql.replace_fields);
        let row = bind_values(query, field_values::<R>(fields))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_deleted_flag(&self, id: i64, deleted: bool) -> StoreResult<bool> {
        let result = sqlx::query(&self.sql.set_deleted_flag)
            .bind(deleted)
            .bind(id)
            .bind(!deleted)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn counts(&self) -> StoreResult<RecordCounts> {
        let (active, deleted): (i64, i64) = sqlx::query_as(&self.sql.counts)
            .fetch_one(&self.pool)
            .await?;
        Ok(RecordCounts { active, deleted })
    }
}
