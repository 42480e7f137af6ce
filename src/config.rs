//! Service configuration loaded from environment variables.
//!
//! All configuration is read once at startup. A `.env` file is honoured through
//! `dotenvy` in `main`.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `JWT_SECRET`: Secret key used to verify admin and user bearer tokens
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,prompt_moderation=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 3000)
//! - `ALLOWED_ORIGINS`: Comma-separated CORS origins for release builds (default: none)
//! - `APPEAL_SUBMISSION_WINDOW_DAYS`: Days after an action during which it can be appealed,
//!   1 to 3650 (default: 7)
//! - `APPEAL_REVIEW_WINDOW_DAYS`: Target days for an admin decision, 1 to 3650 (default: 14)
//! - `APPEALS_ALLOW_REOPEN`: Allow changing approved/denied appeals (default: false)
//! - `ACTION_COOLDOWN_MINUTES`: Minimum gap between two actions of the same type
//!   for the same user; 0 disables the check, at most one year (default: 60)

use crate::domain::appeal::policy::{
    AppealPolicy, DEFAULT_REVIEW_WINDOW_DAYS, DEFAULT_SUBMISSION_WINDOW_DAYS,
};
use chrono::Duration;
use serde::Deserialize;

const MAX_WINDOW_DAYS: i64 = 3650;

/// One year.
const MAX_COOLDOWN_MINUTES: i64 = 525_600;

/// Complete service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Secret key for JWT verification
    pub jwt_secret: String,

    /// Origins allowed to call the API from a browser (release builds only)
    pub allowed_origins: Vec<String>,

    pub appeal_submission_window_days: i64,

    pub appeal_review_window_days: i64,

    /// Permit transitions out of approved/denied
    pub appeals_allow_reopen: bool,

    /// Cool-down between repeat actions of one type against one user
    pub action_cooldown_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or any variable
    /// cannot be parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            host: env_or("HOST", "0.0.0.0".to_string())?,
            port: env_or("PORT", 3000)?,
            jwt_secret: env_required("JWT_SECRET")?,
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|raw| parse_list(&raw))
                .unwrap_or_default(),
            appeal_submission_window_days: env_or(
                "APPEAL_SUBMISSION_WINDOW_DAYS",
                DEFAULT_SUBMISSION_WINDOW_DAYS,
            )?,
            appeal_review_window_days: env_or(
                "APPEAL_REVIEW_WINDOW_DAYS",
                DEFAULT_REVIEW_WINDOW_DAYS,
            )?,
            appeals_allow_reopen: env_or("APPEALS_ALLOW_REOPEN", false)?,
            action_cooldown_minutes: env_or("ACTION_COOLDOWN_MINUTES", 60)?,
        };

        config.check_bounds()?;
        Ok(config)
    }

    /// Rejects windows that would overflow date arithmetic.
    fn check_bounds(&self) -> anyhow::Result<()> {
        for (key, days) in [
            ("APPEAL_SUBMISSION_WINDOW_DAYS", self.appeal_submission_window_days),
            ("APPEAL_REVIEW_WINDOW_DAYS", self.appeal_review_window_days),
        ] {
            if !(1..=MAX_WINDOW_DAYS).contains(&days) {
                anyhow::bail!("{} must be between 1 and {}, got {}", key, MAX_WINDOW_DAYS, days);
            }
        }

        if !(0..=MAX_COOLDOWN_MINUTES).contains(&self.action_cooldown_minutes) {
            anyhow::bail!(
                "ACTION_COOLDOWN_MINUTES must be between 0 and {}, got {}",
                MAX_COOLDOWN_MINUTES,
                self.action_cooldown_minutes
            );
        }

        Ok(())
    }

    /// Configuration for tests and local tooling.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: jwt_secret.to_string(),
            allowed_origins: Vec::new(),
            appeal_submission_window_days: DEFAULT_SUBMISSION_WINDOW_DAYS,
            appeal_review_window_days: DEFAULT_REVIEW_WINDOW_DAYS,
            appeals_allow_reopen: false,
            action_cooldown_minutes: 60,
        }
    }

    pub fn appeal_policy(&self) -> AppealPolicy {
        AppealPolicy {
            submission_window: Duration::days(self.appeal_submission_window_days),
            review_window: Duration::days(self.appeal_review_window_days),
            allow_reopen: self.appeals_allow_reopen,
        }
    }

    /// `None` when the repeat-action guard is disabled.
    pub fn action_cooldown(&self) -> Option<Duration> {
        (self.action_cooldown_minutes > 0).then(|| Duration::minutes(self.action_cooldown_minutes))
    }
}

/// Load a required environment variable.
///
/// # Errors
///
/// Returns an error if the variable is not set.
fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
