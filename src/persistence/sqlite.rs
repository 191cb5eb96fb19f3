use super::{PersistenceResult, WardStore};
use crate::{roster::WardRoster, ward::Ward};
use rusqlite::{Connection, params};
use std::sync::Mutex;

pub struct SqliteWardStore {
    connection: Mutex<Connection>,
}

impl SqliteWardStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS wards (
                position INTEGER NOT NULL,
                id TEXT PRIMARY KEY,
                ward_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_wards(&self, tx: &rusqlite::Transaction, wards: &[Ward]) -> PersistenceResult<()> {
        tx.execute("DELETE FROM wards", [])?;
        let mut stmt =
            tx.prepare("INSERT INTO wards (position, id, ward_json) VALUES (?1, ?2, ?3)")?;
        for (position, ward) in wards.iter().enumerate() {
            let json = serde_json::to_string(ward)?;
            stmt.execute(params![position as i64, ward.id, json])?;
        }
        Ok(())
    }
}

impl WardStore for SqliteWardStore {
    fn save_roster(&self, roster: &WardRoster) -> PersistenceResult<()> {
        super::validate_wards(roster.wards())?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        self.save_wards(&tx, roster.wards())?;
        tx.commit()?;
        tracing::debug!(wards = roster.len(), "roster saved to sqlite");
        Ok(())
    }

    fn load_roster(&self) -> PersistenceResult<Option<WardRoster>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare("SELECT ward_json FROM wards ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut wards = Vec::new();
        for json in rows {
            let json = json?;
            let ward: Ward = serde_json::from_str(&json)?;
            wards.push(ward);
        }

        if wards.is_empty() {
            return Ok(None);
        }

        super::roster_from_wards(wards).map(Some)
    }
}
