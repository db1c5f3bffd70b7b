use std::env;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const DEFAULT_EMAIL_FROM: &str = "Marketplace <noreply@marketplace.local>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Unset means email delivery is disabled.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub from: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub event_buffer_size: usize,
    pub static_dir: String,
    pub email: EmailConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let log_format = match env::var("LOG_FORMAT") {
            Ok(raw) => parse_log_format(&raw)?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            email: EmailConfig {
                api_key: env::var("RESEND_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                endpoint: env::var("RESEND_ENDPOINT")
                    .unwrap_or_else(|_| DEFAULT_RESEND_ENDPOINT.to_string()),
                from: env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string()),
                timeout: Duration::from_millis(parse_or_default("EMAIL_TIMEOUT_MS", 10_000)?),
            },
        })
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_RESEND_ENDPOINT.to_string(),
            from: DEFAULT_EMAIL_FROM.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "compact" | "" => Ok(LogFormat::Compact),
        "json" => Ok(LogFormat::Json),
        other => Err(AppError::Internal(format!("invalid LOG_FORMAT: {other}"))),
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_log_format, LogFormat};

    #[test]
    fn log_format_accepts_known_values() {
        assert_eq!(parse_log_format("JSON").unwrap(), LogFormat::Json);
        assert_eq!(parse_log_format(" compact ").unwrap(), LogFormat::Compact);
        assert!(parse_log_format("pretty").is_err());
    }
}
