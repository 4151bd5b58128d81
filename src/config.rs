use std::path::PathBuf;

const DB_FILE_NAME: &str = "jobboard.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub verbose: bool,
}

impl Config {
    /// An explicit path (from `--db` or `JOBBOARD_DB`) wins over the default.
    pub fn new(db_path: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            db_path: db_path.unwrap_or_else(default_db_path),
            verbose,
        }
    }
}

pub fn default_db_path() -> PathBuf {
    // Platform data dir when the home directory is known, else the working directory.
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobboard") {
        proj_dirs.data_dir().join(DB_FILE_NAME)
    } else {
        PathBuf::from(DB_FILE_NAME)
    }
}
