pub mod models;

use bookstore_db::Database;
use bookstore_kernel::{Migration, Module};

use super::resource::ResourceModule;
pub use models::{Book, BookFields, Books};

const MIGRATIONS: &[Migration] = &[Migration {
    id: "001_init",
    up: r#"
        CREATE TABLE IF NOT EXISTS books (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            title            TEXT    NOT NULL,
            author_id        INTEGER NOT NULL,
            publication_date TEXT    NOT NULL,
            is_deleted       INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id);
        CREATE INDEX IF NOT EXISTS idx_books_is_deleted ON books(is_deleted);
        "#,
}];

pub type BooksModule = ResourceModule<Books>;

/// Create a new instance of the books module
pub fn create_module(db: &Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db, MIGRATIONS))
}
