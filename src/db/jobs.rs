use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

use super::Database;
use crate::error::{Entity, Error, Result};
use crate::models::{Job, Role};
use crate::validation::require_text;

const SELECT_JOB: &str = "SELECT id, category, description, date_posted, employer_id FROM jobs";

impl Database {
    /// Posts a job under an existing employer.
    pub fn create_job(&self, category: &str, description: &str, employer_id: i64) -> Result<Job> {
        if !self.has_role(Role::Employer, employer_id)? {
            return Err(Error::not_found(Entity::Employer, employer_id));
        }
        require_text("Category", category)?;
        require_text("Description", description)?;

        self.conn.execute(
            "INSERT INTO jobs (category, description, employer_id) VALUES (?1, ?2, ?3)",
            params![category, description, employer_id],
        )?;
        let id = self.conn.last_insert_rowid();

        info!(job_id = id, employer_id, category, "job created");
        self.get_job(id)?
            .ok_or_else(|| Error::not_found(Entity::Job, id))
    }

    pub fn get_job(&self, id: i64) -> Result<Option<Job>> {
        let job = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_JOB),
                [id],
                Self::row_to_job,
            )
            .optional()?;
        Ok(job)
    }

    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY id", SELECT_JOB))?;
        let jobs = stmt
            .query_map([], Self::row_to_job)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = jobs.len(), "listed jobs");
        Ok(jobs)
    }

    pub fn jobs_for_employer(&self, employer_id: i64) -> Result<Vec<Job>> {
        if !self.has_role(Role::Employer, employer_id)? {
            return Err(Error::not_found(Entity::Employer, employer_id));
        }
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE employer_id = ?1 ORDER BY id", SELECT_JOB))?;
        let jobs = stmt
            .query_map([employer_id], Self::row_to_job)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    /// Deletes the job along with its applications.
    pub fn remove_job(&self, id: i64) -> Result<()> {
        let deleted = self.conn.execute("DELETE FROM jobs WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(Error::not_found(Entity::Job, id));
        }
        info!(job_id = id, "job removed");
        Ok(())
    }

    fn row_to_job(row: &rusqlite::Row) -> rusqlite::Result<Job> {
        Ok(Job {
            id: row.get(0)?,
            category: row.get(1)?,
            description: row.get(2)?,
            date_posted: row.get(3)?,
            employer_id: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::tests::test_db;
    use crate::error::{Entity, Error};
    use crate::models::Role;

    #[test]
    fn test_create_job() {
        let db = test_db();
        let employer = db
            .create_user("acme", "pw", "hr@acme.com", Role::Employer, None)
            .unwrap();

        let job = db
            .create_job("Engineering", "Rust developer", employer.id)
            .unwrap();
        assert_eq!(job.category, "Engineering");
        assert_eq!(job.description, "Rust developer");
        assert_eq!(job.employer_id, employer.id);
        assert_eq!(db.get_job(job.id).unwrap(), Some(job));
    }

    #[test]
    fn test_date_posted_is_set_on_insert() {
        let db = test_db();
        let employer = db
            .create_user("acme", "pw", "hr@acme.com", Role::Employer, None)
            .unwrap();
        let before = chrono::Utc::now().naive_utc() - chrono::Duration::minutes(1);

        let job = db.create_job("Ops", "On call", employer.id).unwrap();
        assert!(job.date_posted >= before);
    }

    #[test]
    fn test_create_job_requires_employer() {
        let db = test_db();
        let seeker = db
            .create_user("sam", "pw", "sam@example.com", Role::JobSeeker, None)
            .unwrap();

        for employer_id in [seeker.id, 999] {
            let err = db.create_job("Engineering", "Nope", employer_id).unwrap_err();
            assert!(matches!(
                err,
                Error::NotFound {
                    entity: Entity::Employer,
                    id
                } if id == employer_id
            ));
        }
        assert!(db.list_jobs().unwrap().is_empty());
    }

    #[test]
    fn test_create_job_requires_category() {
        let db = test_db();
        let employer = db
            .create_user("acme", "pw", "hr@acme.com", Role::Employer, None)
            .unwrap();
        assert!(matches!(
            db.create_job("", "desc", employer.id),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_jobs_for_employer() {
        let db = test_db();
        let acme = db
            .create_user("acme", "pw", "hr@acme.com", Role::Employer, None)
            .unwrap();
        let globex = db
            .create_user("globex", "pw", "hr@globex.com", Role::Employer, None)
            .unwrap();
        db.create_job("A", "one", acme.id).unwrap();
        db.create_job("B", "two", globex.id).unwrap();
        db.create_job("C", "three", acme.id).unwrap();

        let categories: Vec<_> = db
            .jobs_for_employer(acme.id)
            .unwrap()
            .into_iter()
            .map(|j| j.category)
            .collect();
        assert_eq!(categories, ["A", "C"]);
        assert_eq!(db.list_jobs().unwrap().len(), 3);
    }

    #[test]
    fn test_remove_job() {
        let db = test_db();
        let employer = db
            .create_user("acme", "pw", "hr@acme.com", Role::Employer, None)
            .unwrap();
        let job = db.create_job("Engineering", "desc", employer.id).unwrap();

        db.remove_job(job.id).unwrap();
        assert!(db.get_job(job.id).unwrap().is_none());
        assert!(matches!(
            db.remove_job(job.id),
            Err(Error::NotFound {
                entity: Entity::Job,
                ..
            })
        ));
    }

    #[test]
    fn test_removing_employer_removes_jobs() {
        let db = test_db();
        let acme = db
            .create_user("acme", "pw", "hr@acme.com", Role::Employer, None)
            .unwrap();
        let globex = db
            .create_user("globex", "pw", "hr@globex.com", Role::Employer, None)
            .unwrap();
        db.create_job("A", "one", acme.id).unwrap();
        let kept = db.create_job("B", "two", globex.id).unwrap();

        db.remove_user(acme.id).unwrap();
        assert_eq!(db.list_jobs().unwrap(), vec![kept]);
    }
}
