//! Dispatch pipeline config. Loaded from env: POLL_INTERVAL_SECS, REQUEST_TIMEOUT_SECS,
//! DISPATCH_QUEUE_CAPACITY, DISPATCH_MAX_CONCURRENCY, DISPATCH_ECHO_RECEIPT.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;
pub const DEFAULT_MAX_CONCURRENCY: usize = 32;

/// Timing, queue and fan-out limits of the pipeline.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Fixed delay between fetches.
    pub poll_interval: Duration,
    /// Deadline for every fetch and send.
    pub request_timeout: Duration,
    /// Capacity of the raw-updates and routable-messages queues.
    pub queue_capacity: usize,
    /// Maximum routines executing at once.
    pub max_concurrency: usize,
    /// Send "Received request: <text>" before executing each command.
    pub echo_receipt: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            echo_receipt: false,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl DispatchConfig {
    /// Loads from environment variables; unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: Duration::from_secs(env_or(
                "POLL_INTERVAL_SECS",
                defaults.poll_interval.as_secs(),
            )),
            request_timeout: Duration::from_secs(env_or(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            queue_capacity: env_or("DISPATCH_QUEUE_CAPACITY", defaults.queue_capacity),
            max_concurrency: env_or("DISPATCH_MAX_CONCURRENCY", defaults.max_concurrency),
            echo_receipt: env_or("DISPATCH_ECHO_RECEIPT", defaults.echo_receipt),
        }
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("POLL_INTERVAL_SECS must be greater than 0");
        }
        if self.request_timeout.is_zero() {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }
        if self.queue_capacity == 0 {
            anyhow::bail!("DISPATCH_QUEUE_CAPACITY must be greater than 0");
        }
        if self.max_concurrency == 0 {
            anyhow::bail!("DISPATCH_MAX_CONCURRENCY must be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 5] = [
        "POLL_INTERVAL_SECS",
        "REQUEST_TIMEOUT_SECS",
        "DISPATCH_QUEUE_CAPACITY",
        "DISPATCH_MAX_CONCURRENCY",
        "DISPATCH_ECHO_RECEIPT",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = DispatchConfig::from_env();
        assert_eq!(config.poll_interval, Duration::from_secs(4));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.queue_capacity, 10);
        assert_eq!(config.max_concurrency, 32);
        assert!(!config.echo_receipt);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_custom_values() {
        clear_env();
        env::set_var("POLL_INTERVAL_SECS", "2");
        env::set_var("REQUEST_TIMEOUT_SECS", "9");
        env::set_var("DISPATCH_QUEUE_CAPACITY", "64");
        env::set_var("DISPATCH_MAX_CONCURRENCY", "4");
        env::set_var("DISPATCH_ECHO_RECEIPT", "true");

        let config = DispatchConfig::from_env();
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(9));
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.max_concurrency, 4);
        assert!(config.echo_receipt);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        clear_env();
        env::set_var("DISPATCH_MAX_CONCURRENCY", "lots");
        assert_eq!(DispatchConfig::from_env().max_concurrency, DEFAULT_MAX_CONCURRENCY);
        clear_env();
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = DispatchConfig {
            max_concurrency: 0,
            ..DispatchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = DispatchConfig {
            poll_interval: Duration::ZERO,
            ..DispatchConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
