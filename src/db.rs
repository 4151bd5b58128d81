mod applications;
mod jobs;
mod users;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, ToSql};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Entity, Error, Result};
use crate::models::{ApplicationStatus, DatabaseDump, Role};

/// Tables in dependency order; dropped in reverse.
const TABLES: [&str; 6] = [
    "users",
    "admins",
    "employers",
    "job_seekers",
    "jobs",
    "applications",
];

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        user_type TEXT NOT NULL CHECK (user_type IN ('admin', 'employer', 'job_seeker'))
    );

    CREATE TABLE IF NOT EXISTS admins (
        id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS employers (
        id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
        company_name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS job_seekers (
        id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS jobs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        description TEXT NOT NULL,
        date_posted TEXT NOT NULL DEFAULT (datetime('now')),
        employer_id INTEGER NOT NULL REFERENCES employers(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS applications (
        application_id INTEGER PRIMARY KEY AUTOINCREMENT,
        job_id INTEGER NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
        job_seeker_id INTEGER NOT NULL REFERENCES job_seekers(id) ON DELETE CASCADE,
        application_text TEXT NOT NULL,
        is_accepted INTEGER CHECK (is_accepted IN (0, 1))
    );

    CREATE INDEX IF NOT EXISTS idx_jobs_employer ON jobs(employer_id);
    CREATE INDEX IF NOT EXISTS idx_applications_job ON applications(job_id);
    CREATE INDEX IF NOT EXISTS idx_applications_seeker ON applications(job_seeker_id);
    "#;

pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        debug!(path = %path.display(), "opened database");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn configure(conn: &Connection) -> Result<()> {
        // Cascades only fire with foreign keys enabled, and the setting is per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        info!("database schema created");
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
        for table in TABLES {
            let count: i64 = stmt.query_row([table], |row| row.get(0))?;
            if count == 0 {
                return Err(Error::NotInitialized);
            }
        }
        Ok(())
    }

    /// Drops every table. Only an existing admin may do this.
    pub fn drop_all(&self, admin_id: i64) -> Result<()> {
        if !self.has_role(Role::Admin, admin_id)? {
            return Err(Error::not_found(Entity::Admin, admin_id));
        }

        let mut sql = String::new();
        for table in TABLES.iter().rev() {
            sql.push_str(&format!("DROP TABLE IF EXISTS {};\n", table));
        }
        self.conn.execute_batch(&sql)?;
        info!(admin_id, "all tables dropped");
        Ok(())
    }

    /// Every user, job and application, for the admin overview.
    pub fn dump(&self) -> Result<DatabaseDump> {
        Ok(DatabaseDump {
            users: self.list_users()?,
            jobs: self.list_jobs()?,
            applications: self.list_applications()?,
        })
    }
}

fn role_table(role: Role) -> &'static str {
    match role {
        Role::Admin => "admins",
        Role::Employer => "employers",
        Role::JobSeeker => "job_seekers",
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for ApplicationStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self.as_flag() {
            None => Value::Null,
            Some(accepted) => Value::Integer(accepted as i64),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

impl FromSql for ApplicationStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Option::<bool>::column_result(value).map(ApplicationStatus::from_flag)
    }
}
