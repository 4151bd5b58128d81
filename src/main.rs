mod config;
mod db;
mod error;
mod logging;
mod models;
mod password;
mod validation;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use db::Database;
use models::{Application, ApplicationStatusView, Decision, Job, Role, User};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Job board management - post jobs, apply, and review applications")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = "JOBBOARD_DB")]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and initialize the database
    Init,

    /// User commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Job seeker commands
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Employer commands
    Employer {
        #[command(subcommand)]
        command: EmployerCommands,
    },

    /// Admin commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Sign up a user
    Signup {
        username: String,
        password: String,
        email: String,

        /// admin, employer, or job_seeker
        role: Role,

        /// Company name; rejected for roles other than employer
        #[arg(short, long)]
        company: Option<String>,
    },

    /// Log in with username and password
    Login { username: String, password: String },

    /// List all users
    List {
        #[arg(long)]
        json: bool,
    },

    /// List all job postings
    Jobs {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// Apply to a job
    Apply {
        job_id: i64,
        job_seeker_id: i64,
        application_text: String,
    },

    /// View accepted job offers for a job seeker
    Offers { job_seeker_id: i64 },

    /// View application status for a job seeker
    Status {
        job_seeker_id: i64,

        /// Only show this application
        #[arg(short, long)]
        application: Option<i64>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum EmployerCommands {
    /// Create a job posting
    CreateJob {
        category: String,
        description: String,
        employer_id: i64,
    },

    /// List an employer's job postings
    Jobs { employer_id: i64 },

    /// Review a job application
    Review {
        application_id: i64,

        /// accept or reject
        decision: Decision,
    },

    /// List all applicants for a job
    Applicants { job_id: i64 },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Print all users, jobs and applications
    PrintAll {
        #[arg(long)]
        json: bool,
    },

    /// Drop all tables
    DropAll { admin_id: i64 },

    /// Remove a user and everything they own
    RemoveUser { id: i64 },

    /// Remove a job and its applications
    RemoveJob { id: i64 },

    /// Remove an application
    RemoveApplication { id: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new(cli.db, cli.verbose);
    logging::init_logger(config.verbose);

    let db = Database::open(&config.db_path)?;
    let stdout = std::io::stdout();
    run(&db, cli.command, &mut stdout.lock())
}

fn run(db: &Database, command: Commands, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Init => {
            db.init()?;
            match db.path() {
                Some(path) => writeln!(out, "Database initialized at {}", path.display())?,
                None => writeln!(out, "Database initialized in memory.")?,
            }
            Ok(())
        }
        Commands::User { command } => {
            db.ensure_initialized()?;
            run_user(db, command, out)
        }
        Commands::Job { command } => {
            db.ensure_initialized()?;
            run_job(db, command, out)
        }
        Commands::Employer { command } => {
            db.ensure_initialized()?;
            run_employer(db, command, out)
        }
        Commands::Admin { command } => {
            db.ensure_initialized()?;
            run_admin(db, command, out)
        }
    }
}

fn run_user(db: &Database, command: UserCommands, out: &mut impl Write) -> Result<()> {
    match command {
        UserCommands::Signup {
            username,
            password,
            email,
            role,
            company,
        } => {
            let user = db.create_user(&username, &password, &email, role, company.as_deref())?;
            writeln!(out, "User {} signed up as {} (ID: {}).", user.username, user.role, user.id)?;
        }

        UserCommands::Login { username, password } => {
            let user = db.authenticate(&username, &password)?;
            writeln!(out, "User {} logged in successfully!", user.username)?;
        }

        UserCommands::List { json } => {
            let users = db.list_users()?;
            if json {
                write_json(out, &users)?;
            } else {
                write_users(out, &users)?;
            }
        }

        UserCommands::Jobs { json } => {
            let jobs = db.list_jobs()?;
            if json {
                write_json(out, &jobs)?;
            } else {
                write_jobs(out, &jobs)?;
            }
        }
    }
    Ok(())
}

fn run_job(db: &Database, command: JobCommands, out: &mut impl Write) -> Result<()> {
    match command {
        JobCommands::Apply {
            job_id,
            job_seeker_id,
            application_text,
        } => {
            let application = db.apply_to_job(job_id, job_seeker_id, &application_text)?;
            writeln!(
                out,
                "Application {} submitted for Job {} by Job Seeker {}.",
                application.application_id, job_id, job_seeker_id
            )?;
        }

        JobCommands::Offers { job_seeker_id } => {
            let offers = db.job_offers(job_seeker_id)?;
            if offers.is_empty() {
                writeln!(out, "No accepted offers for Job Seeker {}.", job_seeker_id)?;
            } else {
                write_status_views(out, &offers)?;
            }
        }

        JobCommands::Status {
            job_seeker_id,
            application,
            json,
        } => {
            let views = match application {
                Some(application_id) => vec![db.job_status(job_seeker_id, application_id)?],
                None => db.job_status_all(job_seeker_id)?,
            };
            if json {
                write_json(out, &views)?;
            } else if views.is_empty() {
                writeln!(out, "Job Seeker {} has no applications.", job_seeker_id)?;
            } else {
                write_status_views(out, &views)?;
            }
        }
    }
    Ok(())
}

fn run_employer(db: &Database, command: EmployerCommands, out: &mut impl Write) -> Result<()> {
    match command {
        EmployerCommands::CreateJob {
            category,
            description,
            employer_id,
        } => {
            let job = db.create_job(&category, &description, employer_id)?;
            writeln!(
                out,
                "Job '{}' created successfully under Employer ID {} (Job ID: {}).",
                job.category, job.employer_id, job.id
            )?;
        }

        EmployerCommands::Jobs { employer_id } => {
            let jobs = db.jobs_for_employer(employer_id)?;
            write_jobs(out, &jobs)?;
        }

        EmployerCommands::Review {
            application_id,
            decision,
        } => {
            let application = db.review_application(application_id, decision)?;
            writeln!(
                out,
                "Application {} has been {}.",
                application.application_id,
                application.status.label().to_lowercase()
            )?;
        }

        EmployerCommands::Applicants { job_id } => {
            let applications = db.applicants_for_job(job_id)?;
            if applications.is_empty() {
                writeln!(out, "No applicants for Job ID {}.", job_id)?;
            } else {
                write_applications(out, &applications)?;
            }
        }
    }
    Ok(())
}

fn run_admin(db: &Database, command: AdminCommands, out: &mut impl Write) -> Result<()> {
    match command {
        AdminCommands::PrintAll { json } => {
            let dump = db.dump()?;
            if json {
                write_json(out, &dump)?;
            } else {
                writeln!(out, "\n--- Users ---")?;
                write_users(out, &dump.users)?;
                writeln!(out, "\n--- Jobs ---")?;
                write_jobs(out, &dump.jobs)?;
                writeln!(out, "\n--- Applications ---")?;
                write_applications(out, &dump.applications)?;
            }
        }

        AdminCommands::DropAll { admin_id } => {
            db.drop_all(admin_id)?;
            writeln!(out, "All tables dropped.")?;
        }

        AdminCommands::RemoveUser { id } => {
            db.remove_user(id)?;
            writeln!(out, "User with ID {} removed successfully.", id)?;
        }

        AdminCommands::RemoveJob { id } => {
            db.remove_job(id)?;
            writeln!(out, "Job with ID {} removed successfully.", id)?;
        }

        AdminCommands::RemoveApplication { id } => {
            db.remove_application(id)?;
            writeln!(out, "Application with ID {} removed successfully.", id)?;
        }
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn write_users(out: &mut impl Write, users: &[User]) -> Result<()> {
    if users.is_empty() {
        writeln!(out, "No users found.")?;
        return Ok(());
    }
    writeln!(out, "{:<6} {:<12} {:<20} {:<28} {:<20}", "ID", "ROLE", "USERNAME", "EMAIL", "COMPANY")?;
    writeln!(out, "{}", "-".repeat(90))?;
    for user in users {
        writeln!(
            out,
            "{:<6} {:<12} {:<20} {:<28} {:<20}",
            user.id,
            user.role,
            truncate(&user.username, 18),
            truncate(&user.email, 26),
            truncate(user.company_name.as_deref().unwrap_or("-"), 18)
        )?;
    }
    Ok(())
}

fn write_jobs(out: &mut impl Write, jobs: &[Job]) -> Result<()> {
    if jobs.is_empty() {
        writeln!(out, "No jobs available.")?;
        return Ok(());
    }
    writeln!(out, "{:<6} {:<18} {:<32} {:<9} {:<19}", "ID", "CATEGORY", "DESCRIPTION", "EMPLOYER", "POSTED")?;
    writeln!(out, "{}", "-".repeat(88))?;
    for job in jobs {
        writeln!(
            out,
            "{:<6} {:<18} {:<32} {:<9} {:<19}",
            job.id,
            truncate(&job.category, 16),
            truncate(&job.description, 30),
            job.employer_id,
            job.date_posted.format("%Y-%m-%d %H:%M:%S")
        )?;
    }
    Ok(())
}

fn write_applications(out: &mut impl Write, applications: &[Application]) -> Result<()> {
    if applications.is_empty() {
        writeln!(out, "No applications found.")?;
        return Ok(());
    }
    writeln!(out, "{:<6} {:<6} {:<8} {:<10} {:<40}", "ID", "JOB", "SEEKER", "STATUS", "TEXT")?;
    writeln!(out, "{}", "-".repeat(74))?;
    for app in applications {
        writeln!(
            out,
            "{:<6} {:<6} {:<8} {:<10} {:<40}",
            app.application_id,
            app.job_id,
            app.job_seeker_id,
            app.status,
            truncate(&app.application_text, 38)
        )?;
    }
    Ok(())
}

fn write_status_views(out: &mut impl Write, views: &[ApplicationStatusView]) -> Result<()> {
    writeln!(out, "{:<6} {:<6} {:<18} {:<32} {:<10}", "APP", "JOB", "CATEGORY", "DESCRIPTION", "STATUS")?;
    writeln!(out, "{}", "-".repeat(76))?;
    for view in views {
        writeln!(
            out,
            "{:<6} {:<6} {:<18} {:<32} {:<10}",
            view.application_id,
            view.job_id,
            truncate(&view.job_category, 16),
            truncate(&view.description, 30),
            view.status
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
