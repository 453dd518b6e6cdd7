use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use incident_protocol::IncidentRecord;
use rusqlite::{params, Connection, Row};

use super::{IncidentStore, NewIncident, StoreError};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS incidents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    location TEXT NOT NULL,
    description TEXT NOT NULL,
    people_involved TEXT NOT NULL,
    immediate_causes TEXT NOT NULL,
    contributing_factors TEXT NOT NULL,
    root_cause TEXT NOT NULL,
    underlying_causes TEXT NOT NULL,
    corrective_actions TEXT NOT NULL,
    analyzed_at TEXT NOT NULL
);
";

const SELECT_COLUMNS: &str = "id, date, location, description, people_involved, \
     immediate_causes, contributing_factors, root_cause, underlying_causes, \
     corrective_actions, analyzed_at";

/// SQLite-backed incident store behind a single mutex-guarded connection.
pub(crate) struct SqliteIncidentStore {
    conn: Mutex<Connection>,
}

impl SqliteIncidentStore {
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub(crate) fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl IncidentStore for SqliteIncidentStore {
    fn insert(&self, incident: NewIncident) -> Result<IncidentRecord, StoreError> {
        let conn = self.conn()?;
        let NewIncident {
            submission,
            analysis,
            analyzed_at,
        } = incident;
        conn.execute(
            r"
            INSERT INTO incidents (
                date, location, description, people_involved, immediate_causes,
                contributing_factors, root_cause, underlying_causes,
                corrective_actions, analyzed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
            params![
                submission.date,
                submission.location,
                submission.description,
                submission.people_involved,
                submission.immediate_causes,
                submission.contributing_factors,
                analysis.root_cause,
                analysis.underlying_causes,
                analysis.corrective_actions,
                analyzed_at,
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(event = "store.insert", id, "saved incident");

        Ok(IncidentRecord {
            id,
            date: submission.date,
            location: submission.location,
            description: submission.description,
            people_involved: submission.people_involved,
            immediate_causes: submission.immediate_causes,
            contributing_factors: submission.contributing_factors,
            root_cause: analysis.root_cause,
            underlying_causes: analysis.underlying_causes,
            corrective_actions: analysis.corrective_actions,
            analyzed_at,
        })
    }

    fn list(&self) -> Result<Vec<IncidentRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM incidents ORDER BY analyzed_at DESC, id DESC"
        ))?;
        let records = stmt
            .query_map([], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<IncidentRecord> {
    Ok(IncidentRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        location: row.get(2)?,
        description: row.get(3)?,
        people_involved: row.get(4)?,
        immediate_causes: row.get(5)?,
        contributing_factors: row.get(6)?,
        root_cause: row.get(7)?,
        underlying_causes: row.get(8)?,
        corrective_actions: row.get(9)?,
        analyzed_at: row.get(10)?,
    })
}
