use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($($name:ident),+ $(,)?) => {
        $(
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            )]
            pub struct $name(pub Uuid);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<Uuid> for $name {
                fn from(value: Uuid) -> Self {
                    Self(value)
                }
            }

            // Stored as hyphenated TEXT so external tools can read the rows.
            impl ToSql for $name {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.0.to_string()))
                }
            }

            impl FromSql for $name {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    let text = value.as_str()?;
                    Uuid::parse_str(text)
                        .map($name)
                        .map_err(|err| FromSqlError::Other(Box::new(err)))
                }
            }
        )+
    };
}

entity_id!(
    WorldId,
    LocationId,
    LinkId,
    BuildingId,
    RoomId,
    DeviceId,
    NetworkId,
    FileId,
    PuzzleId,
    CharacterId,
    MissionId,
    ObjectiveId,
    StoryElementId,
    ItemId,
    ShopId,
    InventoryId,
    VulnerabilityId,
);

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn ids_round_trip_through_text_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT)").unwrap();
        let id = DeviceId(Uuid::from_u128(0x1234));
        conn.execute("INSERT INTO t (id) VALUES (?1)", rusqlite::params![id])
            .unwrap();

        let raw: String = conn.query_row("SELECT id FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(raw, id.0.to_string());
        let back: DeviceId = conn.query_row("SELECT id FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn malformed_text_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<LocationId> =
            conn.query_row("SELECT 'not-a-uuid'", [], |row| row.get(0));
        assert!(result.is_err());
    }
}
