pub mod repository;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use repository::WorldStore;
pub use sqlite::{WorldDb, WorldDbError, WORLD_TABLES};
pub use store::SqliteStore;
