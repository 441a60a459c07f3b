//! Zone persistence over SQLite
//!
//! A run's zones form one generation: `replace_all` deletes the previous
//! set and inserts the new one inside a single transaction, so a reader
//! never observes a mix of generations and a failed insert leaves the
//! prior set intact.

use crate::domain::{PipelineError, Zone};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS zones (
    id                TEXT PRIMARY KEY,
    name              TEXT NOT NULL,
    neighborhood_name TEXT NOT NULL,
    boundary_coords   TEXT NOT NULL,
    created_at        TEXT NOT NULL
);
";

pub struct ZoneStore {
    conn: Connection,
}

impl ZoneStore {
    /// Open (or create) the zone database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let conn = Connection::open(path.as_ref())?;
        Self::init(conn)
    }

    /// In-memory store, used by tests
    pub fn open_in_memory() -> Result<Self, PipelineError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, PipelineError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Replace the previous generation of zones with `zones`.
    ///
    /// Delete and batched insert run in one transaction; any failure
    /// rolls the whole operation back.
    pub fn replace_all(&mut self, zones: &[Zone]) -> Result<usize, PipelineError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM zones", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO zones (id, name, neighborhood_name, boundary_coords, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for zone in zones {
                let coords = serde_json::to_string(&zone.boundary_coords)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
                stmt.execute(params![
                    zone.id,
                    zone.name,
                    zone.neighborhood_name,
                    coords,
                    zone.created_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;

        info!(deleted = %deleted, inserted = %zones.len(), "zones_replaced");
        Ok(zones.len())
    }

    pub fn count(&self) -> Result<usize, PipelineError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM zones", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Load every stored zone in insertion order
    pub fn load_all(&self) -> Result<Vec<Zone>, PipelineError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, neighborhood_name, boundary_coords, created_at
             FROM zones ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            let coords_json: String = row.get(3)?;
            let boundary_coords: Vec<[f64; 2]> = serde_json::from_str(&coords_json)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
            let created_raw: String = row.get(4)?;
            let created_at = DateTime::parse_from_rfc3339(&created_raw)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        4,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Utc);

            Ok(Zone {
                id: row.get(0)?,
                name: row.get(1)?,
                neighborhood_name: row.get(2)?,
                boundary_coords,
                created_at,
            })
        })?;

        let mut zones = Vec::new();
        for zone in rows {
            zones.push(zone?);
        }
        Ok(zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(neighborhood: &str, sequence: usize) -> Zone {
        Zone::new(
            neighborhood,
            sequence,
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
            Utc::now(),
        )
    }

    #[test]
    fn test_replace_all_inserts_and_counts() {
        let mut store = ZoneStore::open_in_memory().unwrap();
        let zones = vec![zone("Elmwood", 1), zone("Elmwood", 2)];

        let written = store.replace_all(&zones).unwrap();
        assert_eq!(written, 2);
        assert_eq!(store.count().unwrap(), 2);

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded[0].name, "Elmwood - Zone 1");
        assert_eq!(loaded[1].name, "Elmwood - Zone 2");
        assert_eq!(loaded[0].boundary_coords.len(), 4);
    }

    #[test]
    fn test_replace_all_replaces_previous_generation() {
        let mut store = ZoneStore::open_in_memory().unwrap();
        store.replace_all(&[zone("Old", 1), zone("Old", 2), zone("Old", 3)]).unwrap();

        store.replace_all(&[zone("New", 1)]).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].neighborhood_name, "New");
    }

    #[test]
    fn test_failed_insert_keeps_prior_generation() {
        let mut store = ZoneStore::open_in_memory().unwrap();
        store.replace_all(&[zone("Old", 1), zone("Old", 2)]).unwrap();

        // Duplicate primary key forces the insert to fail mid-batch
        let mut duplicate = zone("New", 2);
        let first = zone("New", 1);
        duplicate.id = first.id.clone();

        let err = store.replace_all(&[first, duplicate]).unwrap_err();
        assert!(matches!(err, PipelineError::PersistenceFailure(_)));

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().all(|z| z.neighborhood_name == "Old"));
    }

    #[test]
    fn test_replace_all_with_empty_set_clears_store() {
        let mut store = ZoneStore::open_in_memory().unwrap();
        store.replace_all(&[zone("Old", 1)]).unwrap();

        assert_eq!(store.replace_all(&[]).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 0);
    }
}
