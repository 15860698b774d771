use std::env;
use std::str::FromStr;

use cron::Schedule;

use crate::error::AppError;

pub const DEFAULT_REMINDER_CRON: &str = "0 0 9 * * *";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_api_url: String,
    pub reminder_schedule: Schedule,
    pub dispatch_concurrency: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("Invalid PORT: {}", raw)))?,
            None => 8080,
        };

        let cron_expr = get("REMINDER_CRON").unwrap_or_else(|| DEFAULT_REMINDER_CRON.to_string());
        let reminder_schedule = Schedule::from_str(&cron_expr)
            .map_err(|e| AppError::Config(format!("Invalid REMINDER_CRON '{}': {}", cron_expr, e)))?;

        let dispatch_concurrency = match get("DISPATCH_CONCURRENCY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| AppError::Config(format!("Invalid DISPATCH_CONCURRENCY: {}", raw)))?
                .max(1),
            None => 1,
        };

        Ok(AppConfig {
            port,
            database_url: get("DATABASE_URL").unwrap_or_else(|| "sqlite://app.db".to_string()),
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_api_url: get("TELEGRAM_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            reminder_schedule,
            dispatch_concurrency,
        })
    }
}
