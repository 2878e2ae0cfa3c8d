use bookstore_db::{FieldKind, FieldSpec, FieldValue, Record, Resource};
use serde::{Deserialize, Serialize};

/// Descriptor for the `authors` table.
pub struct Authors;

/// Stored author row.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Author {
    /// Unique identifier assigned by the store
    pub id: i64,
    /// Author's full name
    pub name: String,
    /// Author's contact email
    pub email: String,
    /// Soft-delete flag
    pub is_deleted: bool,
}

impl Record for Author {
    fn id(&self) -> i64 {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

/// Request model for creating or replacing an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorFields {
    pub name: String,
    pub email: String,
}

impl Resource for Authors {
    const TABLE: &'static str = "authors";
    const SINGULAR: &'static str = "author";
    const LABEL: &'static str = "Author";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec {
            name: "name",
            kind: FieldKind::Text,
            description: "Author's full name",
        },
        FieldSpec {
            name: "email",
            kind: FieldKind::Text,
            description: "Author's contact email",
        },
    ];

    type Record = Author;
    type Fields = AuthorFields;

    fn values(fields: &AuthorFields) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(fields.name.clone()),
            FieldValue::Text(fields.email.clone()),
        ]
    }
}
