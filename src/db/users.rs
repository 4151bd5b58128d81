use rusqlite::{OptionalExtension, params};
use tracing::{debug, info, warn};

use super::{Database, role_table};
use crate::error::{Entity, Error, Result};
use crate::models::{DEFAULT_COMPANY_NAME, Role, User};
use crate::password::{hash_password, verify_password};
use crate::validation::{validate_email, validate_password, validate_username};

const SELECT_USER: &str = "SELECT u.id, u.username, u.email, u.user_type, e.company_name
     FROM users u
     LEFT JOIN employers e ON e.id = u.id";

impl Database {
    /// Signs up a user under `role`. `company_name` only applies to employers.
    pub fn create_user(
        &self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
        company_name: Option<&str>,
    ) -> Result<User> {
        validate_username(username)?;
        validate_email(email)?;
        validate_password(password)?;
        if company_name.is_some() && role != Role::Employer {
            return Err(Error::Validation(format!(
                "A company name only applies to employers, not {}.",
                role
            )));
        }

        if self.username_exists(username)? {
            return Err(Error::UsernameTaken(username.to_string()));
        }
        if self.email_exists(email)? {
            return Err(Error::EmailTaken(email.to_string()));
        }

        let hashed = hash_password(password);

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO users (username, password, email, user_type) VALUES (?1, ?2, ?3, ?4)",
            params![username, hashed, email, role],
        )?;
        let id = tx.last_insert_rowid();

        match role {
            Role::Employer => {
                let company = company_name
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .unwrap_or(DEFAULT_COMPANY_NAME);
                tx.execute(
                    "INSERT INTO employers (id, company_name) VALUES (?1, ?2)",
                    params![id, company],
                )?;
            }
            Role::Admin | Role::JobSeeker => {
                tx.execute(
                    &format!("INSERT INTO {} (id) VALUES (?1)", role_table(role)),
                    [id],
                )?;
            }
        }
        tx.commit()?;

        info!(user_id = id, username, %role, "user created");
        self.get_user(id)?
            .ok_or_else(|| Error::not_found(Entity::User, id))
    }

    /// Returns the user when `password` matches the stored hash.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let stored: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT id, password FROM users WHERE username = ?1",
                [username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match stored {
            Some((id, hash)) if verify_password(password, &hash) => {
                info!(user_id = id, username, "user logged in");
                self.get_user(id)?
                    .ok_or_else(|| Error::not_found(Entity::User, id))
            }
            _ => {
                warn!(username, "failed login attempt");
                Err(Error::InvalidCredentials)
            }
        }
    }

    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{} WHERE u.id = ?1", SELECT_USER),
                [id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY u.id", SELECT_USER))?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    /// Deletes the user; role rows, owned jobs and applications go with it.
    pub fn remove_user(&self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(Error::not_found(Entity::User, id));
        }
        info!(user_id = id, "user removed");
        Ok(())
    }

    pub(crate) fn has_role(&self, role: Role, id: i64) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                &format!("SELECT id FROM {} WHERE id = ?1", role_table(role)),
                [id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1",
            [username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?1",
            [email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            role: row.get(3)?,
            company_name: row.get(4)?,
        })
    }
}
