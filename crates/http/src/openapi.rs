//! OpenAPI documents built from resource descriptors and module fragments.

use bookstore_db::{FieldKind, FieldSpec, Resource};
use bookstore_kernel::ModuleRegistry;
use serde_json::{json, Map, Value};

const ERROR_RESPONSE: &str = "#/components/schemas/ErrorResponse";

fn field_schema(field: &FieldSpec) -> Value {
    let mut schema = match field.kind {
        FieldKind::Text => json!({"type": "string"}),
        FieldKind::Integer => json!({"type": "integer", "format": "int64"}),
        FieldKind::Date => json!({"type": "string", "format": "date"}),
    };
    schema["description"] = Value::String(field.description.to_string());
    schema
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": ERROR_RESPONSE }
            }
        }
    })
}

fn message_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } },
                    "required": ["message"]
                }
            }
        }
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema }
        }
    })
}

fn wrapped(key: &str, schema: Value) -> Value {
    let mut properties = Map::new();
    properties.insert(key.to_string(), schema);
    json!({
        "type": "object",
        "properties": properties,
        "required": [key]
    })
}

/// OpenAPI fragment (paths relative to the mount point, plus schemas) for a resource.
pub fn resource_fragment<R: Resource>() -> Value {
    let label = R::LABEL;
    let tag = [label.to_string() + "s"];
    let record_ref = json!({ "$ref": format!("#/components/schemas/{}", label) });
    let input_ref = json!({ "$ref": format!("#/components/schemas/{}Input", label) });
    let id_param = json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    }]);
    let request_body = json!({
        "required": true,
        "content": { "application/json": { "schema": input_ref } }
    });

    let mut input_properties = Map::new();
    for field in R::FIELDS {
        input_properties.insert(field.name.to_string(), field_schema(field));
    }
    let required: Vec<&str> = R::FIELDS.iter().map(|field| field.name).collect();

    let mut record_properties = Map::new();
    record_properties.insert(
        "id".to_string(),
        json!({"type": "integer", "format": "int64", "description": format!("Unique identifier for the {}", R::SINGULAR)}),
    );
    record_properties.extend(input_properties.clone());
    record_properties.insert(
        "is_deleted".to_string(),
        json!({"type": "boolean", "description": "Soft-delete flag"}),
    );
    let mut record_required = vec!["id"];
    record_required.extend(required.iter().copied());
    record_required.push("is_deleted");

    let mut updated = wrapped(R::SINGULAR, record_ref.clone());
    updated["properties"]["message"] = json!({"type": "string"});

    let collection = json!({
        "get": {
            "summary": format!("List active {}", R::TABLE),
            "tags": tag,
            "responses": {
                "200": json_response(
                    &format!("Active {}", R::TABLE),
                    wrapped(R::TABLE, json!({"type": "array", "items": record_ref})),
                ),
                "500": error_response("Database error")
            }
        },
        "post": {
            "summary": format!("Create {}", R::SINGULAR),
            "tags": tag,
            "requestBody": request_body,
            "responses": {
                "201": json_response(&format!("{} created", label), created_schema()),
                "400": error_response("Missing required fields"),
                "500": error_response("Database error")
            }
        }
    });

    let item = json!({
        "get": {
            "summary": format!("Get active {}", R::SINGULAR),
            "tags": tag,
            "parameters": id_param,
            "responses": {
                "200": json_response(label, wrapped(R::SINGULAR, record_ref.clone())),
                "404": error_response(&format!("{} not found or deleted", label)),
                "500": error_response("Database error")
            }
        },
        "put": {
            "summary": format!("Replace {} fields", R::SINGULAR),
            "tags": tag,
            "parameters": id_param,
            "requestBody": request_body,
            "responses": {
                "200": json_response(&format!("{} updated", label), updated),
                "400": error_response("Missing required fields"),
                "404": error_response(&format!("{} not found", label)),
                "500": error_response("Database error")
            }
        },
        "delete": {
            "summary": format!("Soft-delete {}", R::SINGULAR),
            "tags": tag,
            "parameters": id_param,
            "responses": {
                "200": message_response(&format!("{} deleted", label)),
                "404": error_response(&format!("{} not found or already deleted", label)),
                "500": error_response("Database error")
            }
        }
    });

    let restore = json!({
        "patch": {
            "summary": format!("Restore soft-deleted {}", R::SINGULAR),
            "tags": tag,
            "parameters": id_param,
            "responses": {
                "200": message_response(&format!("{} restored", label)),
                "400": error_response(&format!("{} is already active", label)),
                "404": error_response(&format!("{} not found", label)),
                "500": error_response("Database error")
            }
        }
    });

    let mut schemas = Map::new();
    schemas.insert(
        label.to_string(),
        json!({
            "type": "object",
            "properties": record_properties,
            "required": record_required
        }),
    );
    schemas.insert(
        format!("{}Input", label),
        json!({
            "type": "object",
            "properties": input_properties,
            "required": required
        }),
    );

    json!({
        "paths": {
            "/": collection,
            "/{id}": item,
            "/{id}/restore": restore
        },
        "components": { "schemas": schemas }
    })
}

fn created_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": { "type": "string" },
            "id": { "type": "integer", "format": "int64" }
        },
        "required": ["message", "id"]
    })
}

/// Full document: shared schemas, health routes, and every module's fragment
/// with its paths prefixed by the module mount point.
pub fn document(registry: &ModuleRegistry) -> Value {
    let mut openapi_spec = json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Bookstore API",
            "version": "1.0.0",
            "description": "Authors and books with soft-delete and restore"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = json!({
        "type": "object",
        "properties": {
            "error": { "type": "string" }
        },
        "required": ["error"]
    });

    openapi_spec["paths"]["/healthz"] = json!({
        "get": {
            "summary": "Liveness check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": { "text/plain": { "schema": { "type": "string" } } }
                }
            }
        }
    });

    openapi_spec["paths"]["/readyz"] = json!({
        "get": {
            "summary": "Database readiness check",
            "responses": {
                "200": json_response("Database reachable", json!({
                    "type": "object",
                    "properties": { "status": { "type": "string" } }
                })),
                "500": error_response("Database connection failed")
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(Value::as_object) {
            for (path, path_item) in paths {
                openapi_spec["paths"][mounted_path(module.name(), path)] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(Value::as_object)
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

/// `/` maps to the mount point itself, anything else is appended.
fn mounted_path(module_name: &str, path: &str) -> String {
    if path == "/" {
        format!("/{}", module_name)
    } else {
        format!("/{}{}", module_name, path)
    }
}
