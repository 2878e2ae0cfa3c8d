//! CRUD and restore routes for any [`Resource`].

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use bookstore_db::{Lifecycle, LifecycleError, Resource};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{method_not_allowed, AppError};

/// Routes for one resource, relative to its mount point:
///
/// | Method | Path            | Operation |
/// |--------|-----------------|-----------|
/// | GET    | `/`             | list      |
/// | POST   | `/`             | create    |
/// | GET    | `/{id}`         | get       |
/// | PUT    | `/{id}`         | update    |
/// | DELETE | `/{id}`         | delete    |
/// | PATCH  | `/{id}/restore` | restore   |
pub fn resource_routes<R: Resource>(lifecycle: Lifecycle<R>) -> Router {
    Router::new()
        .route("/", get(list_records::<R>).post(create_record::<R>))
        .route(
            "/{id}",
            get(get_record::<R>)
                .put(update_record::<R>)
                .delete(delete_record::<R>),
        )
        .route("/{id}/restore", patch(restore_record::<R>))
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(lifecycle)
}

type ApiResult<T> = Result<T, AppError>;

async fn list_records<R: Resource>(
    State(lifecycle): State<Lifecycle<R>>,
) -> ApiResult<Json<Value>> {
    let records = lifecycle.list().await?;
    Ok(Json(keyed(R::TABLE, records)?))
}

async fn get_record<R: Resource>(
    State(lifecycle): State<Lifecycle<R>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = record_id::<R>(id)?;
    let record = lifecycle.get(id).await?;
    Ok(Json(keyed(R::SINGULAR, record)?))
}

async fn create_record<R: Resource>(
    State(lifecycle): State<Lifecycle<R>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let payload = json_body(payload)?;
    let id = lifecycle.create(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("{} created successfully", R::LABEL),
            "id": id,
        })),
    ))
}

async fn update_record<R: Resource>(
    State(lifecycle): State<Lifecycle<R>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let id = record_id::<R>(id)?;
    let payload = json_body(payload)?;
    let record = lifecycle.update(id, &payload).await?;

    let mut body = keyed(R::SINGULAR, record)?;
    body["message"] = Value::String(format!("{} updated successfully", R::LABEL));
    Ok(Json(body))
}

async fn delete_record<R: Resource>(
    State(lifecycle): State<Lifecycle<R>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = record_id::<R>(id)?;
    lifecycle.delete(id).await.map_err(|e| match e {
        LifecycleError::NotFound { resource, .. } => {
            AppError::not_found(format!("{} not found or already deleted", resource))
        }
        other => other.into(),
    })?;
    Ok(Json(message(format!("{} deleted successfully", R::LABEL))))
}

async fn restore_record<R: Resource>(
    State(lifecycle): State<Lifecycle<R>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = record_id::<R>(id)?;
    lifecycle.restore(id).await?;
    Ok(Json(message(format!("{} restored successfully", R::LABEL))))
}

/// Ids that are not integers never match a record.
fn record_id<R: Resource>(id: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::not_found(format!("{} not found", R::LABEL)))
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::validation(format!("Invalid JSON body: {}", rejection.body_text())))
}

fn keyed(key: &str, value: impl Serialize) -> ApiResult<Value> {
    let value = serde_json::to_value(value).map_err(anyhow::Error::from)?;
    let mut body = Map::new();
    body.insert(key.to_string(), value);
    Ok(Value::Object(body))
}

fn message(text: String) -> Value {
    json!({ "message": text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use bookstore_db::{FieldKind, FieldSpec, FieldValue, Record};
    use serde::Deserialize;
    use tower::ServiceExt;

    struct Tags;

    #[derive(Debug, Serialize, sqlx::FromRow)]
    struct Tag {
        id: i64,
        label: String,
        is_deleted: bool,
    }

    impl Record for Tag {
        fn id(&self) -> i64 {
            self.id
        }

        fn is_deleted(&self) -> bool {
            self.is_deleted
        }
    }

    #[derive(Debug, Deserialize)]
    struct TagFields {
        label: String,
    }

    impl Resource for Tags {
        const TABLE: &'static str = "tags";
        const SINGULAR: &'static str = "tag";
        const LABEL: &'static str = "Tag";
        const FIELDS: &'static [FieldSpec] = &[FieldSpec {
            name: "label",
            kind: FieldKind::Text,
            description: "Tag label",
        }];

        type Record = Tag;
        type Fields = TagFields;

        fn values(fields: &TagFields) -> Vec<FieldValue> {
            vec![FieldValue::Text(fields.label.clone())]
        }
    }

    async fn tags_router() -> Router {
        let db = bookstore_db::Database::connect(
            &bookstore_kernel::settings::DatabaseSettings::with_url("sqlite::memory:"),
        )
        .await
        .unwrap();
        db.apply_migrations(&[(
            "tags".to_string(),
            bookstore_kernel::Migration {
                id: "001_tags",
                up: "CREATE TABLE IF NOT EXISTS tags (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    label TEXT NOT NULL,
                    is_deleted INTEGER NOT NULL DEFAULT 0
                );",
            },
        )])
        .await
        .unwrap();
        resource_routes(Lifecycle::<Tags>::from_database(&db))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_create_and_fetch_use_descriptor_keys() {
        let router = tags_router().await;

        let (status, body) = send(&router, "POST", "/", Some(json!({"label": "rust"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Tag created successfully");
        let id = body["id"].as_i64().unwrap();

        let (status, body) = send(&router, "GET", &format!("/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tag"]["label"], "rust");

        let (status, body) = send(&router, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tags"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_integer_id_is_not_found() {
        let router = tags_router().await;
        let (status, body) = send(&router, "GET", "/abc", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Tag not found"}));
    }

    #[tokio::test]
    async fn test_missing_body_is_bad_request() {
        let router = tags_router().await;
        let (status, body) = send(&router, "POST", "/", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_delete_twice_reports_already_deleted() {
        let router = tags_router().await;
        let (_, body) = send(&router, "POST", "/", Some(json!({"label": "x"}))).await;
        let id = body["id"].as_i64().unwrap();

        let (status, _) = send(&router, "DELETE", &format!("/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&router, "DELETE", &format!("/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Tag not found or already deleted"}));
    }
}
