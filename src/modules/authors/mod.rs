pub mod models;

use bookstore_db::Database;
use bookstore_kernel::{Migration, Module};

use super::resource::ResourceModule;
pub use models::{Author, AuthorFields, Authors};

const MIGRATIONS: &[Migration] = &[Migration {
    id: "001_init",
    up: r#"
        CREATE TABLE IF NOT EXISTS authors (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT    NOT NULL,
            email      TEXT    NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_authors_is_deleted ON authors(is_deleted);
        "#,
}];

pub type AuthorsModule = ResourceModule<Authors>;

/// Create a new instance of the authors module
pub fn create_module(db: &Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new(db, MIGRATIONS))
}
