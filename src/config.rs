use std::env;
use std::path::PathBuf;
use std::time::Duration;

const API_BASE: &str = "https://fsa-puppy-bowl.herokuapp.com/api";
const DEFAULT_COHORT: &str = "2803-PUPPIES";
const DEFAULT_DETAILS_PATH: &str = "details.html";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Collection endpoint; single players live at `<endpoint>/<id>`.
    pub endpoint: String,
    pub details_path: String,
    pub request_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: endpoint_for_cohort(DEFAULT_COHORT),
            details_path: DEFAULT_DETAILS_PATH.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_file: None,
        }
    }
}

impl Config {
    /// Reads `.env.local` and `.env` (if present) before looking at the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cohort = lookup("PUPPY_BOWL_COHORT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_COHORT.to_string());
        let endpoint = lookup("PUPPY_BOWL_API_URL")
            .and_then(non_empty)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| endpoint_for_cohort(&cohort));
        let details_path = lookup("PUPPY_BOWL_DETAILS_PATH")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_DETAILS_PATH.to_string());
        let timeout_secs = lookup("PUPPY_BOWL_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);
        let log_file = lookup("PUPPY_BOWL_LOG_FILE")
            .and_then(non_empty)
            .map(PathBuf::from);

        Self {
            endpoint,
            details_path,
            request_timeout: Duration::from_secs(timeout_secs),
            log_file,
        }
    }
}

pub fn endpoint_for_cohort(cohort: &str) -> String {
    format!("{API_BASE}/{cohort}/players")
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
