use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

use super::Database;
use crate::error::{Entity, Error, Result};
use crate::models::{Application, ApplicationStatus, ApplicationStatusView, Decision, Role};

const SELECT_APPLICATION: &str =
    "SELECT application_id, job_id, job_seeker_id, application_text, is_accepted FROM applications";

const SELECT_STATUS_VIEW: &str =
    "SELECT a.application_id, a.job_id, j.category, j.description, j.employer_id, a.is_accepted
     FROM applications a
     JOIN jobs j ON j.id = a.job_id
     WHERE a.job_seeker_id = ?1";

impl Database {
    /// Submits a pending application. A seeker may apply to each job once.
    pub fn apply_to_job(
        &self,
        job_id: i64,
        job_seeker_id: i64,
        application_text: &str,
    ) -> Result<Application> {
        if self.get_job(job_id)?.is_none() {
            return Err(Error::not_found(Entity::Job, job_id));
        }
        self.require_job_seeker(job_seeker_id)?;

        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT application_id FROM applications WHERE job_id = ?1 AND job_seeker_id = ?2",
                [job_id, job_seeker_id],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(Error::DuplicateApplication {
                job_id,
                job_seeker_id,
            });
        }

        self.conn.execute(
            "INSERT INTO applications (job_id, job_seeker_id, application_text) VALUES (?1, ?2, ?3)",
            params![job_id, job_seeker_id, application_text],
        )?;
        let id = self.conn.last_insert_rowid();

        info!(application_id = id, job_id, job_seeker_id, "application submitted");
        self.get_application(id)?
            .ok_or_else(|| Error::not_found(Entity::Application, id))
    }

    /// Records the employer's decision, replacing any earlier one.
    pub fn review_application(&self, application_id: i64, decision: Decision) -> Result<Application> {
        let status = decision.status();
        let updated = self.conn.execute(
            "UPDATE applications SET is_accepted = ?1 WHERE application_id = ?2",
            params![status, application_id],
        )?;
        if updated == 0 {
            return Err(Error::not_found(Entity::Application, application_id));
        }

        info!(application_id, %status, "application reviewed");
        self.get_application(application_id)?
            .ok_or_else(|| Error::not_found(Entity::Application, application_id))
    }

    pub fn get_application(&self, application_id: i64) -> Result<Option<Application>> {
        let application = self
            .conn
            .query_row(
                &format!("{} WHERE application_id = ?1", SELECT_APPLICATION),
                [application_id],
                Self::row_to_application,
            )
            .optional()?;
        Ok(application)
    }

    pub fn list_applications(&self) -> Result<Vec<Application>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY application_id", SELECT_APPLICATION))?;
        let applications = stmt
            .query_map([], Self::row_to_application)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = applications.len(), "listed applications");
        Ok(applications)
    }

    pub fn applicants_for_job(&self, job_id: i64) -> Result<Vec<Application>> {
        if self.get_job(job_id)?.is_none() {
            return Err(Error::not_found(Entity::Job, job_id));
        }
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE job_id = ?1 ORDER BY application_id",
            SELECT_APPLICATION
        ))?;
        let applications = stmt
            .query_map([job_id], Self::row_to_application)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(applications)
    }

    /// Status of every application the seeker has made.
    pub fn job_status_all(&self, job_seeker_id: i64) -> Result<Vec<ApplicationStatusView>> {
        self.require_job_seeker(job_seeker_id)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY a.application_id", SELECT_STATUS_VIEW))?;
        let views = stmt
            .query_map([job_seeker_id], Self::row_to_status_view)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(views)
    }

    pub fn job_status(&self, job_seeker_id: i64, application_id: i64) -> Result<ApplicationStatusView> {
        self.require_job_seeker(job_seeker_id)?;
        self.conn
            .query_row(
                &format!("{} AND a.application_id = ?2", SELECT_STATUS_VIEW),
                [job_seeker_id, application_id],
                Self::row_to_status_view,
            )
            .optional()?
            .ok_or(Error::ApplicationNotOwned {
                application_id,
                job_seeker_id,
            })
    }

    /// Accepted applications only.
    pub fn job_offers(&self, job_seeker_id: i64) -> Result<Vec<ApplicationStatusView>> {
        Ok(self
            .job_status_all(job_seeker_id)?
            .into_iter()
            .filter(|view| view.status == ApplicationStatus::Accepted)
            .collect())
    }

    pub fn remove_application(&self, application_id: i64) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM applications WHERE application_id = ?1",
            [application_id],
        )?;
        if deleted == 0 {
            return Err(Error::not_found(Entity::Application, application_id));
        }
        info!(application_id, "application removed");
        Ok(())
    }

    fn require_job_seeker(&self, job_seeker_id: i64) -> Result<()> {
        if !self.has_role(Role::JobSeeker, job_seeker_id)? {
            return Err(Error::not_found(Entity::JobSeeker, job_seeker_id));
        }
        Ok(())
    }

    fn row_to_application(row: &rusqlite::Row) -> rusqlite::Result<Application> {
        Ok(Application {
            application_id: row.get(0)?,
            job_id: row.get(1)?,
            job_seeker_id: row.get(2)?,
            application_text: row.get(3)?,
            status: row.get(4)?,
        })
    }

    fn row_to_status_view(row: &rusqlite::Row) -> rusqlite::Result<ApplicationStatusView> {
        Ok(ApplicationStatusView {
            application_id: row.get(0)?,
            job_id: row.get(1)?,
            job_category: row.get(2)?,
            description: row.get(3)?,
            employer_id: row.get(4)?,
            status: row.get(5)?,
        })
    }
}
