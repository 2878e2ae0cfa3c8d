pub mod authors;
pub mod books;
pub mod resource;

use bookstore_db::Database;
use bookstore_kernel::ModuleRegistry;

/// Register all resource modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &Database) {
    registry.register(authors::create_module(db));
    registry.register(books::create_module(db));
}
