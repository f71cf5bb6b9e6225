//! CLI parser and config loading.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rbot_dispatch::DispatchConfig;
use rbot_telegram::TelegramConfig;

pub const DEFAULT_LOG_FILE: &str = "logs/rbot.log";

#[derive(Parser)]
#[command(name = "rbot")]
#[command(about = "Routine bot CLI: long-poll Telegram and answer commands", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; flags override).
    Run {
        /// Bot token; overrides BOT_TOKEN.
        #[arg(short, long)]
        token: Option<String>,
        /// File holding the bot token; overrides BOT_TOKEN.
        #[arg(long, conflicts_with = "token")]
        token_file: Option<PathBuf>,
        /// Seconds between polls; overrides POLL_INTERVAL_SECS.
        #[arg(long)]
        poll_interval_secs: Option<u64>,
        /// Maximum concurrently executing routines; overrides DISPATCH_MAX_CONCURRENCY.
        #[arg(long)]
        max_concurrency: Option<usize>,
        /// Reply "Received request: ..." before executing each command.
        #[arg(long)]
        echo_receipt: bool,
    },
    /// List the registered routines and their signatures.
    Routines,
}

/// Full bot config: Telegram connectivity + dispatch pipeline + log file.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    pub dispatch: DispatchConfig,
    pub log_file: String,
}

impl BotConfig {
    /// Loads from environment variables. `token`/`token_file` override BOT_TOKEN.
    pub fn load(token: Option<String>, token_file: Option<PathBuf>) -> Result<Self> {
        let telegram = TelegramConfig::load(token, token_file.as_deref())?;
        let dispatch = DispatchConfig::from_env();
        let log_file = telegram
            .log_file
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
        Ok(Self {
            telegram,
            dispatch,
            log_file,
        })
    }

    /// Validates each part and the cross-checks between them. Call before starting.
    pub fn validate(&self) -> Result<()> {
        self.telegram.validate()?;
        self.dispatch.validate()?;
        let long_poll = Duration::from_secs(u64::from(self.telegram.long_poll_secs));
        if long_poll >= self.dispatch.request_timeout {
            anyhow::bail!(
                "TELEGRAM_LONG_POLL_SECS ({}s) must be shorter than REQUEST_TIMEOUT_SECS ({:?})",
                self.telegram.long_poll_secs,
                self.dispatch.request_timeout
            );
        }
        Ok(())
    }
}

/// Loads [`BotConfig`] for `rbot run`, applying flag overrides on top of env.
pub fn load_config(command: &Commands) -> Result<BotConfig> {
    let Commands::Run {
        token,
        token_file,
        poll_interval_secs,
        max_concurrency,
        echo_receipt,
    } = command
    else {
        anyhow::bail!("only `run` needs bot config");
    };

    let mut config = BotConfig::load(token.clone(), token_file.clone())?;
    if let Some(secs) = poll_interval_secs {
        config.dispatch.poll_interval = Duration::from_secs(*secs);
    }
    if let Some(limit) = max_concurrency {
        config.dispatch.max_concurrency = *limit;
    }
    if *echo_receipt {
        config.dispatch.echo_receipt = true;
    }
    Ok(config)
}
