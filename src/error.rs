use std::fmt;

use thiserror::Error;

/// Record kinds named in `NotFound` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Admin,
    Employer,
    JobSeeker,
    Job,
    Application,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::User => write!(f, "User"),
            Entity::Admin => write!(f, "Admin"),
            Entity::Employer => write!(f, "Employer"),
            Entity::JobSeeker => write!(f, "Job Seeker"),
            Entity::Job => write!(f, "Job"),
            Entity::Application => write!(f, "Application"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Username '{0}' is already taken. Please choose a different username.")]
    UsernameTaken(String),

    #[error("Email '{0}' is already registered. Please use a different email address.")]
    EmailTaken(String),

    #[error("Invalid role '{0}'. Choose from 'admin', 'employer', or 'job_seeker'.")]
    InvalidRole(String),

    #[error("Invalid decision '{0}'. Use 'accept' or 'reject'.")]
    InvalidDecision(String),

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("{entity} with ID {id} does not exist.")]
    NotFound { entity: Entity, id: i64 },

    #[error("Application with ID {application_id} does not exist for Job Seeker {job_seeker_id}.")]
    ApplicationNotOwned {
        application_id: i64,
        job_seeker_id: i64,
    },

    #[error("Job Seeker {job_seeker_id} has already applied for Job {job_id}.")]
    DuplicateApplication { job_id: i64, job_seeker_id: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database not initialized. Run 'jobboard init' first.")]
    NotInitialized,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(entity: Entity, id: i64) -> Self {
        Error::NotFound { entity, id }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_entity() {
        let err = Error::not_found(Entity::JobSeeker, 7);
        assert_eq!(err.to_string(), "Job Seeker with ID 7 does not exist.");
    }

    #[test]
    fn test_duplicate_application_message() {
        let err = Error::DuplicateApplication {
            job_id: 3,
            job_seeker_id: 4,
        };
        assert_eq!(
            err.to_string(),
            "Job Seeker 4 has already applied for Job 3."
        );
    }
}
