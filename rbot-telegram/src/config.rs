//! Telegram connectivity config: token, optional API URL, long-poll timeout, log file.
//! Loaded from env: BOT_TOKEN (or BOT_TOKEN_FILE), TELEGRAM_API_URL (or TELOXIDE_API_URL),
//! TELEGRAM_LONG_POLL_SECS, LOG_FILE.

use std::env;
use std::path::Path;

use anyhow::{Context, Result};

/// Minimal Telegram bot config (connectivity and logging only).
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    /// Server-side getUpdates timeout; 0 means short polling.
    pub long_poll_secs: u32,
    pub log_file: Option<String>,
}

/// Reads a token file, trimming surrounding whitespace.
pub fn read_token_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let token = std::fs::read_to_string(path)
        .with_context(|| format!("reading bot token from {}", path.display()))?;
    let token = token.trim().to_string();
    if token.is_empty() {
        anyhow::bail!("bot token file {} is empty", path.display());
    }
    Ok(token)
}

impl TelegramConfig {
    /// Loads from env: BOT_TOKEN or BOT_TOKEN_FILE required; the rest optional.
    pub fn from_env() -> Result<Self> {
        Self::load(None, None)
    }

    /// Loads from env with overrides. Token precedence: `token`, `token_file`, BOT_TOKEN,
    /// BOT_TOKEN_FILE.
    pub fn load(token: Option<String>, token_file: Option<&Path>) -> Result<Self> {
        let bot_token = match (token, token_file) {
            (Some(token), _) => token,
            (None, Some(path)) => read_token_file(path)?,
            (None, None) => match env::var("BOT_TOKEN") {
                Ok(token) => token,
                Err(_) => match env::var("BOT_TOKEN_FILE") {
                    Ok(path) => read_token_file(path)?,
                    Err(_) => anyhow::bail!("BOT_TOKEN not set"),
                },
            },
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let long_poll_secs = env::var("TELEGRAM_LONG_POLL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let log_file = env::var("LOG_FILE").ok();
        Ok(Self {
            bot_token,
            telegram_api_url,
            long_poll_secs,
            log_file,
        })
    }

    /// Builds config with the given token; other fields empty.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            long_poll_secs: 0,
            log_file: None,
        }
    }

    /// Parsed API URL, if one is configured.
    pub fn api_url(&self) -> Result<Option<reqwest::Url>> {
        self.telegram_api_url
            .as_deref()
            .map(|url| {
                reqwest::Url::parse(url).map_err(|_| {
                    anyhow::anyhow!(
                        "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                        url
                    )
                })
            })
            .transpose()
    }

    /// Validate config (token present, API URL parses).
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        self.api_url()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for key in [
            "BOT_TOKEN",
            "BOT_TOKEN_FILE",
            "TELEGRAM_API_URL",
            "TELOXIDE_API_URL",
            "TELEGRAM_LONG_POLL_SECS",
            "LOG_FILE",
        ] {
            env::remove_var(key);
        }
    }

    /// **Test: with_token sets bot_token; everything else is empty.**
    #[test]
    fn test_with_token() {
        let config = TelegramConfig::with_token("test_token".to_string());
        assert_eq!(config.bot_token, "test_token");
        assert!(config.telegram_api_url.is_none());
        assert_eq!(config.long_poll_secs, 0);
        assert!(config.log_file.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        env::set_var("BOT_TOKEN", "env_token");
        env::set_var("TELOXIDE_API_URL", "http://localhost:8081");
        env::set_var("TELEGRAM_LONG_POLL_SECS", "2");
        env::set_var("LOG_FILE", "logs/test.log");

        let config = TelegramConfig::from_env().unwrap();
        assert_eq!(config.bot_token, "env_token");
        assert_eq!(config.telegram_api_url.as_deref(), Some("http://localhost:8081"));
        assert_eq!(config.long_poll_secs, 2);
        assert_eq!(config.log_file.as_deref(), Some("logs/test.log"));
        assert!(config.validate().is_ok());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_token_fails() {
        clear_env();
        let err = TelegramConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN not set"));
    }

    #[test]
    #[serial]
    fn test_token_precedence() {
        clear_env();
        env::set_var("BOT_TOKEN", "env_token");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file_token  ").unwrap();

        let config = TelegramConfig::load(None, Some(file.path())).unwrap();
        assert_eq!(config.bot_token, "file_token");

        let config = TelegramConfig::load(Some("cli_token".into()), Some(file.path())).unwrap();
        assert_eq!(config.bot_token, "cli_token");

        env::remove_var("BOT_TOKEN");
        env::set_var("BOT_TOKEN_FILE", file.path());
        assert_eq!(TelegramConfig::from_env().unwrap().bot_token, "file_token");

        clear_env();
    }

    #[test]
    fn test_empty_token_file_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(read_token_file(file.path()).is_err());
    }

    #[test]
    fn test_validate_invalid_api_url() {
        let mut config = TelegramConfig::with_token("t".into());
        config.telegram_api_url = Some("not-a-valid-url".into());
        assert!(config.validate().is_err());
    }
}
