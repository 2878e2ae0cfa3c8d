use bookstore_db::{FieldKind, FieldSpec, FieldValue, Record, Resource};
use serde::{Deserialize, Serialize};

/// Descriptor for the `books` table.
pub struct Books;

/// Stored book row.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Book {
    /// Unique identifier assigned by the store
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Id of the author; not checked against `authors`
    pub author_id: i64,
    /// Publication date as given, e.g. `2022-01-01`
    pub publication_date: String,
    /// Soft-delete flag
    pub is_deleted: bool,
}

impl Record for Book {
    fn id(&self) -> i64 {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

/// Request model for creating or replacing a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookFields {
    pub title: String,
    pub author_id: i64,
    pub publication_date: String,
}

impl Resource for Books {
    const TABLE: &'static str = "books";
    const SINGULAR: &'static str = "book";
    const LABEL: &'static str = "Book";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec {
            name: "title",
            kind: FieldKind::Text,
            description: "Title of the book",
        },
        FieldSpec {
            name: "author_id",
            kind: FieldKind::Integer,
            description: "Id of the book's author",
        },
        FieldSpec {
            name: "publication_date",
            kind: FieldKind::Date,
            description: "Publication date (YYYY-MM-DD)",
        },
    ];

    type Record = Book;
    type Fields = BookFields;

    fn values(fields: &BookFields) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(fields.title.clone()),
            FieldValue::Integer(fields.author_id),
            FieldValue::Text(fields.publication_date.clone()),
        ]
    }
}
