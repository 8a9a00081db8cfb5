use std::path::Path;
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::schema::SCHEMA;
use super::{IdScope, Store};
use crate::error::{Error, Result};
use crate::types::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

const PROJECT_COLUMNS: &str =
    "id, name, percentage, description, updated, version, flag, flag_version";

const DELIVERABLE_COLUMNS: &str = "id, pid, name, due, percentage, submitted, description";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn exists(&self, sql: &str, user: &str, project_id: i64) -> Result<bool> {
        let conn = self.conn();
        let found = conn
            .query_row(sql, params![user, project_id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn list_ids<K: rusqlite::ToSql>(&self, sql: &str, key: K) -> Result<Vec<i64>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![key], |row| row.get(0))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap_or_else(|e| {
        tracing::error!("Invalid date in database: '{}' - {}", s, e);
        Utc::now().date_naive()
    })
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        percentage: row.get(2)?,
        description: row.get(3)?,
        updated: parse_date(&row.get::<_, String>(4)?),
        version: row.get(5)?,
        flag: Flag {
            value: row.get(6)?,
            version: row.get(7)?,
        },
    })
}

fn deliverable_from_row(row: &Row<'_>) -> rusqlite::Result<Deliverable> {
    Ok(Deliverable {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        due: row.get(3)?,
        percentage: row.get(4)?,
        submitted: row.get(5)?,
        description: row.get(6)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO users (name, salt, password, is_manager) VALUES (?1, ?2, ?3, ?4)",
            params![user.name, user.salt, user.password_hash, user.is_manager],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_user(&self, name: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT name, salt, password, is_manager FROM users WHERE name = ?1",
            params![name],
            |row| {
                Ok(User {
                    name: row.get(0)?,
                    salt: row.get(1)?,
                    password_hash: row.get(2)?,
                    is_manager: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_user_password(&self, name: &str, salt: &[u8], password_hash: &[u8]) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET salt = ?1, password = ?2 WHERE name = ?3",
            params![salt, password_hash, name],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn set_manager(&self, name: &str, is_manager: bool) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET is_manager = ?1 WHERE name = ?2",
            params![is_manager, name],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_user(&self, name: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM users WHERE name = ?1", params![name])?;
        Ok(rows > 0)
    }

    // Ownership operations

    fn is_owner(&self, user: &str, project_id: i64) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM owns WHERE name = ?1 AND pid = ?2",
            user,
            project_id,
        )
    }

    fn add_owner(&self, user: &str, project_id: i64) -> Result<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO owns (name, pid) VALUES (?1, ?2)",
            params![user, project_id],
        )?;
        Ok(())
    }

    fn remove_owner(&self, user: &str, project_id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM owns WHERE name = ?1 AND pid = ?2",
            params![user, project_id],
        )?;
        Ok(rows > 0)
    }

    fn count_owners(&self, project_id: i64) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM owns WHERE pid = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn list_owned_projects(&self, user: &str) -> Result<Vec<i64>> {
        self.list_ids("SELECT pid FROM owns WHERE name = ?1 ORDER BY pid", user)
    }

    fn transfer_project(&self, project_id: i64, user: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM owns WHERE pid = ?1", params![project_id])?;
        tx.execute(
            "DELETE FROM views WHERE name = ?1 AND pid = ?2",
            params![user, project_id],
        )?;
        tx.execute(
            "INSERT INTO owns (name, pid) VALUES (?1, ?2)",
            params![user, project_id],
        )?;

        tx.commit()?;
        Ok(())
    }

    // Viewing operations

    fn is_viewer(&self, user: &str, project_id: i64) -> Result<bool> {
        self.exists(
            "SELECT 1 FROM views WHERE name = ?1 AND pid = ?2",
            user,
            project_id,
        )
    }

    fn add_viewer(&self, user: &str, project_id: i64) -> Result<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO views (name, pid) VALUES (?1, ?2)",
            params![user, project_id],
        )?;
        Ok(())
    }

    fn remove_viewer(&self, user: &str, project_id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM views WHERE name = ?1 AND pid = ?2",
            params![user, project_id],
        )?;
        Ok(rows > 0)
    }

    fn list_viewed_projects(&self, user: &str) -> Result<Vec<i64>> {
        self.list_ids("SELECT pid FROM views WHERE name = ?1 ORDER BY pid", user)
    }

    fn list_viewers(&self, project_id: i64) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT name FROM views WHERE pid = ?1 ORDER BY name")?;
        let rows = stmt.query_map(params![project_id], |row| row.get(0))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn remove_project_viewers(&self, project_id: i64) -> Result<()> {
        self.conn()
            .execute("DELETE FROM views WHERE pid = ?1", params![project_id])?;
        Ok(())
    }

    fn remove_user_views(&self, user: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM views WHERE name = ?1", params![user])?;
        Ok(())
    }

    // Project operations

    fn create_project(&self, project: &Project) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO projects ({PROJECT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
            ),
            params![
                project.id,
                project.name,
                project.percentage,
                project.description,
                format_date(&project.updated),
                project.version,
                project.flag.value,
                project.flag.version,
            ],
        )?;
        Ok(())
    }

    fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
            params![id],
            project_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_project(&self, project: &Project) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE projects SET name = ?1, percentage = ?2, description = ?3, updated = ?4, version = ?5
             WHERE id = ?6",
            params![
                project.name,
                project.percentage,
                project.description,
                format_date(&project.updated),
                project.version,
                project.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_project(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Flag operations

    fn get_flag(&self, project_id: i64) -> Result<Option<Flag>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT flag, flag_version FROM projects WHERE id = ?1",
            params![project_id],
            |row| {
                Ok(Flag {
                    value: row.get(0)?,
                    version: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn set_flag(&self, project_id: i64, flag: &Flag) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE projects SET flag = ?1, flag_version = ?2 WHERE id = ?3",
            params![flag.value, flag.version, project_id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Deliverable operations

    fn create_deliverable(&self, deliverable: &Deliverable) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO deliverables ({DELIVERABLE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
            ),
            params![
                deliverable.id,
                deliverable.project_id,
                deliverable.name,
                deliverable.due,
                deliverable.percentage,
                deliverable.submitted,
                deliverable.description,
            ],
        )?;
        Ok(())
    }

    fn get_deliverable(&self, project_id: i64, id: i64) -> Result<Option<Deliverable>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {DELIVERABLE_COLUMNS} FROM deliverables WHERE pid = ?1 AND id = ?2"),
            params![project_id, id],
            deliverable_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_deliverables(&self, project_id: i64) -> Result<Vec<i64>> {
        self.list_ids(
            "SELECT id FROM deliverables WHERE pid = ?1 ORDER BY id",
            project_id,
        )
    }

    fn update_deliverable(&self, deliverable: &Deliverable) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE deliverables SET name = ?1, due = ?2, percentage = ?3, submitted = ?4, description = ?5
             WHERE pid = ?6 AND id = ?7",
            params![
                deliverable.name,
                deliverable.due,
                deliverable.percentage,
                deliverable.submitted,
                deliverable.description,
                deliverable.project_id,
                deliverable.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_deliverable(&self, project_id: i64, id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM deliverables WHERE pid = ?1 AND id = ?2",
            params![project_id, id],
        )?;
        Ok(rows > 0)
    }

    fn delete_project_deliverables(&self, project_id: i64) -> Result<()> {
        self.conn().execute(
            "DELETE FROM deliverables WHERE pid = ?1",
            params![project_id],
        )?;
        Ok(())
    }

    fn id_in_use(&self, scope: IdScope, id: i64) -> Result<bool> {
        let conn = self.conn();
        let found = match scope {
            IdScope::Project => conn
                .query_row("SELECT 1 FROM projects WHERE id = ?1", params![id], |_| {
                    Ok(())
                })
                .optional()?,
            IdScope::Deliverable { project_id } => conn
                .query_row(
                    "SELECT 1 FROM deliverables WHERE pid = ?1 AND id = ?2",
                    params![project_id, id],
                    |_| Ok(()),
                )
                .optional()?,
        };
        Ok(found.is_some())
    }
}
