//! Bot entry: validate config, init logging, wire gateway + registry into the dispatcher, run
//! until Ctrl-C.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rbot_core::{init_tracing, User};
use rbot_dispatch::{CancellationToken, Dispatcher};
use rbot_telegram::TelegramGateway;
use routine_registry::RoutineRegistry;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::cli::BotConfig;

/// Runs the bot with the given routines. Returns after Ctrl-C once in-flight routines finish.
#[instrument(skip(config, registry))]
pub async fn run_bot(config: BotConfig, registry: RoutineRegistry) -> Result<()> {
    config.validate()?;
    init_tracing(Some(&config.log_file))?;

    let gateway = TelegramGateway::from_config(&config.telegram)
        .context("building Telegram gateway")?;

    // getMe failing is not fatal; the poll loop keeps retrying the gateway.
    log_identity(config.dispatch.request_timeout, gateway.identity()).await;

    info!(
        routines = ?registry.names(),
        poll_interval = ?config.dispatch.poll_interval,
        max_concurrency = config.dispatch.max_concurrency,
        "Initializing bot"
    );

    let shutdown = CancellationToken::new();
    cancel_on_signal(tokio::signal::ctrl_c(), shutdown.clone());

    let dispatcher = Dispatcher::new(Arc::new(gateway), Arc::new(registry), config.dispatch);
    info!("Bot started successfully");
    dispatcher.run(shutdown).await?;
    info!("Bot stopped");
    Ok(())
}

/// Awaits the bot identity under `deadline` and logs the outcome. Returns the identity if it
/// arrived in time.
pub async fn log_identity<F>(deadline: Duration, identity: F) -> Option<User>
where
    F: Future<Output = rbot_core::Result<User>>,
{
    match tokio::time::timeout(deadline, identity).await {
        Ok(Ok(me)) => {
            info!(bot_id = me.id, username = ?me.username, "Bot identity verified");
            Some(me)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "getMe failed, continuing");
            None
        }
        Err(_) => {
            warn!(timeout_ms = deadline.as_millis() as u64, "getMe timed out, continuing");
            None
        }
    }
}

/// Cancels `shutdown` when `signal` fires. If the signal cannot be listened for, the error is
/// logged and the bot keeps running.
pub fn cancel_on_signal<F>(signal: F, shutdown: CancellationToken) -> JoinHandle<()>
where
    F: Future<Output = io::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        match signal.await {
            Ok(()) => {
                info!("Ctrl-C received, shutting down");
                shutdown.cancel();
            }
            Err(e) => error!(error = %e, "listening for Ctrl-C failed, running without it"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbot_core::BotError;

    fn bot_user() -> User {
        User {
            id: 42,
            username: Some("rbot".to_string()),
            first_name: Some("Routine".to_string()),
            last_name: None,
        }
    }

    /// **Test: a getMe that never answers gives up at the deadline.**
    #[tokio::test]
    async fn test_log_identity_times_out() {
        let identity = std::future::pending::<rbot_core::Result<User>>();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            log_identity(Duration::from_millis(20), identity),
        )
        .await
        .expect("log_identity should respect its deadline");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_log_identity_success_and_failure() {
        let me = log_identity(Duration::from_secs(1), async { Ok(bot_user()) }).await;
        assert_eq!(me, Some(bot_user()));

        let failed = log_identity(Duration::from_secs(1), async {
            Err(BotError::GatewayUnavailable("unauthorized".into()))
        })
        .await;
        assert!(failed.is_none());
    }

    /// **Test: a signal listener that fails to register leaves the bot running.**
    #[tokio::test]
    async fn test_signal_registration_failure_does_not_cancel() {
        let shutdown = CancellationToken::new();
        cancel_on_signal(
            async { Err(io::Error::other("no signal handler")) },
            shutdown.clone(),
        )
        .await
        .unwrap();
        assert!(!shutdown.is_cancelled());
    }

    #[tokio::test]
    async fn test_signal_cancels_shutdown() {
        let shutdown = CancellationToken::new();
        cancel_on_signal(async { Ok(()) }, shutdown.clone())
            .await
            .unwrap();
        assert!(shutdown.is_cancelled());
    }
}
