use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Company name given to employers that sign up without one.
pub const DEFAULT_COMPANY_NAME: &str = "DefaultCompany";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employer,
    JobSeeker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employer => "employer",
            Role::JobSeeker => "job_seeker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "employer" => Ok(Role::Employer),
            "job_seeker" => Ok(Role::JobSeeker),
            other => Err(Error::InvalidRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Only set for employers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub date_posted: NaiveDateTime,
    pub employer_id: i64,
}

/// Tri-state review outcome, stored as a nullable boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn from_flag(is_accepted: Option<bool>) -> Self {
        match is_accepted {
            None => ApplicationStatus::Pending,
            Some(true) => ApplicationStatus::Accepted,
            Some(false) => ApplicationStatus::Rejected,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ApplicationStatus::Pending => None,
            ApplicationStatus::Accepted => Some(true),
            ApplicationStatus::Rejected => Some(false),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// An employer's verdict on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn status(&self) -> ApplicationStatus {
        match self {
            Decision::Accept => ApplicationStatus::Accepted,
            Decision::Reject => ApplicationStatus::Rejected,
        }
    }
}

impl FromStr for Decision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept" => Ok(Decision::Accept),
            "reject" => Ok(Decision::Reject),
            _ => Err(Error::InvalidDecision(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub application_id: i64,
    pub job_id: i64,
    pub job_seeker_id: i64,
    pub application_text: String,
    pub status: ApplicationStatus,
}

/// What a job seeker sees about one of their applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: i64,
    pub job_id: i64,
    pub job_category: String,
    pub description: String,
    pub employer_id: i64,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseDump {
    pub users: Vec<User>,
    pub jobs: Vec<Job>,
    pub applications: Vec<Application>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("employer".parse::<Role>().unwrap(), Role::Employer);
        assert_eq!(" job_seeker ".parse::<Role>().unwrap(), Role::JobSeeker);

        let err = "recruiter".parse::<Role>().unwrap_err();
        assert!(matches!(err, Error::InvalidRole(ref r) if r == "recruiter"));
    }

    #[test]
    fn test_role_round_trips_through_display() {
        for role in [Role::Admin, Role::Employer, Role::JobSeeker] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_decision_is_case_insensitive() {
        assert_eq!("ACCEPT".parse::<Decision>().unwrap(), Decision::Accept);
        assert_eq!("Reject".parse::<Decision>().unwrap(), Decision::Reject);
        assert!("maybe".parse::<Decision>().is_err());
    }

    #[test]
    fn test_status_flag_mapping() {
        assert_eq!(ApplicationStatus::from_flag(None), ApplicationStatus::Pending);
        assert_eq!(ApplicationStatus::from_flag(Some(true)), ApplicationStatus::Accepted);
        assert_eq!(ApplicationStatus::from_flag(Some(false)), ApplicationStatus::Rejected);
        assert_eq!(ApplicationStatus::Rejected.as_flag(), Some(false));
        assert_eq!(ApplicationStatus::default().label(), "Pending");
    }

    #[test]
    fn test_display_honours_width() {
        assert_eq!(format!("{:<12}|", Role::Employer), "employer    |");
        assert_eq!(format!("{:<10}|", ApplicationStatus::Pending), "Pending   |");
        assert_eq!(format!("{:>9}", ApplicationStatus::Accepted), " Accepted");
    }

    #[test]
    fn test_user_json_omits_missing_company() {
        let user = User {
            id: 1,
            username: "sam".to_string(),
            email: "sam@example.com".to_string(),
            role: Role::JobSeeker,
            company_name: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "job_seeker");
        assert!(json.get("company_name").is_none());
    }
}
