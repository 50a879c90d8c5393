use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Transaction};
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{World, WorldId};
use crate::world::repository::WorldStore;
use crate::world::schema::{self, MIGRATIONS};
use crate::world::store::SqliteStore;

/// Tables carrying a `world_id` column, parents before children.
pub const WORLD_TABLES: &[&str] = &[
    "locations",
    "location_connections",
    "buildings",
    "rooms",
    "characters",
    "devices",
    "networks",
    "files",
    "hacking_puzzles",
    "missions",
    "objectives",
    "story_elements",
    "hardware_items",
    "consumable_items",
    "armor_items",
    "software_items",
    "weapon_items",
    "implant_items",
    "vulnerabilities",
    "shops",
    "shop_inventory",
];

const MIGRATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
  version INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

#[derive(Debug, Error)]
pub enum WorldDbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("metadata encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidData(String),
    #[error("migration {version} ({name}) failed: {source}")]
    Migration {
        version: i64,
        name: &'static str,
        source: rusqlite::Error,
    },
    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: i64, supported: i64 },
}

pub struct WorldDb {
    conn: Connection,
}

impl WorldDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WorldDbError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, WorldDbError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, WorldDbError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    fn apply_migrations(&mut self) -> Result<(), WorldDbError> {
        self.conn.execute_batch(MIGRATIONS_TABLE)?;
        let current = self.schema_version()?;
        let supported = schema::latest_version();
        if current > supported {
            return Err(WorldDbError::UnsupportedSchema {
                found: current,
                supported,
            });
        }

        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            let tx = self.conn.transaction()?;
            tx.execute_batch(migration.sql)
                .map_err(|source| WorldDbError::Migration {
                    version: migration.version,
                    name: migration.name,
                    source,
                })?;
            tx.execute(
                "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
            tx.commit()?;
            info!(
                version = migration.version,
                name = migration.name,
                "applied migration"
            );
        }
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i64, WorldDbError> {
        let version = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(version)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn transaction(&mut self) -> Result<Transaction<'_>, WorldDbError> {
        Ok(self.conn.transaction()?)
    }

    /// Store view over the connection outside any explicit transaction.
    pub fn store(&self) -> SqliteStore<'_> {
        SqliteStore::new(&self.conn)
    }

    pub fn world(&self, id: WorldId) -> Result<Option<World>, WorldDbError> {
        self.store().world(id)
    }

    pub fn world_ids(&self) -> Result<Vec<WorldId>, WorldDbError> {
        let mut stmt = self.conn.prepare("SELECT id FROM worlds ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| row.get::<_, WorldId>(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    /// Removes a world and, through the cascades, every row scoped to it.
    pub fn delete_world(&mut self, id: WorldId) -> Result<bool, WorldDbError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM worlds WHERE id = ?1", params![id])?;
        tx.commit()?;
        debug!(world_id = %id, removed, "deleted world");
        Ok(removed > 0)
    }

    pub fn table_count(&self, table: &str, world_id: WorldId) -> Result<u64, WorldDbError> {
        let sql = if table == "worlds" {
            "SELECT COUNT(*) FROM worlds WHERE id = ?1".to_string()
        } else if WORLD_TABLES.contains(&table) {
            format!("SELECT COUNT(*) FROM {} WHERE world_id = ?1", table)
        } else {
            return Err(WorldDbError::InvalidData(format!(
                "unknown world table {}",
                table
            )));
        };
        let count = self
            .conn
            .query_row(&sql, params![world_id], |row| row.get::<_, i64>(0))
            .optional()?
            .unwrap_or(0);
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_applies_every_migration() {
        let db = WorldDb::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), schema::latest_version());
        let fk: i64 = db
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn reapplying_migrations_is_a_no_op() {
        let mut db = WorldDb::open_in_memory().unwrap();
        db.apply_migrations().unwrap();
        let applied: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }

    #[test]
    fn world_reads_back_through_the_store() {
        use crate::config::WorldCounts;
        use crate::model::{WorldMetadata, WORLD_FORMAT_VERSION};

        let db = WorldDb::open_in_memory().unwrap();
        let world = World {
            id: WorldId(uuid::Uuid::from_u128(7)),
            name: "Neon Grid".to_string(),
            description: "test".to_string(),
            author: "tests".to_string(),
            version: WORLD_FORMAT_VERSION.to_string(),
            complexity: 2,
            is_active: true,
            metadata: WorldMetadata {
                seed: 42,
                counts: WorldCounts::from_complexity(2),
            },
        };
        db.store().insert_world(&world).unwrap();
        assert_eq!(db.world(world.id).unwrap(), Some(world));
        assert_eq!(db.world(WorldId(uuid::Uuid::from_u128(8))).unwrap(), None);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut db = WorldDb::open_in_memory().unwrap();
        db.connection()
            .execute(
                "INSERT INTO schema_migrations (version, name) VALUES (99, 'future')",
                [],
            )
            .unwrap();
        let err = db.apply_migrations().unwrap_err();
        assert!(matches!(err, WorldDbError::UnsupportedSchema { found: 99, .. }));
    }

    #[test]
    fn table_count_rejects_unknown_tables() {
        let db = WorldDb::open_in_memory().unwrap();
        let id = WorldId(uuid::Uuid::from_u128(1));
        assert_eq!(db.table_count("devices", id).unwrap(), 0);
        assert!(db.table_count("sqlite_master; --", id).is_err());
    }
}
