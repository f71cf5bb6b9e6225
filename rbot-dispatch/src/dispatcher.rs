//! The dispatch pipeline.
//!
//! Three stages connected by bounded queues:
//!
//! - **poll**: on a fixed interval fetches updates at the current offset (bounded by
//!   `request_timeout`) and hands non-empty batches to the raw-updates queue. It waits for the
//!   batch to be acknowledged before fetching again, so every fetch uses the committed offset.
//! - **acknowledge**: advances the offset past every update in arrival order, before anything
//!   is executed, and forwards updates that carry a message to the routable queue.
//! - **dispatch**: spawns one task per message (bounded by `max_concurrency`) that routes,
//!   executes and replies.
//!
//! Full queues block their producer. Gateway failures are logged and never stop the pipeline;
//! routine failures become chat replies.

use std::sync::Arc;
use std::time::Duration;

use rbot_core::{BotError, Gateway, Message, Update};
use routine_registry::RoutineRegistry;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio::time::{timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::config::DispatchConfig;
use crate::offset::OffsetTracker;
use crate::route::reply_text;

/// Polls a [`Gateway`] and dispatches every message to the routines of a [`RoutineRegistry`].
pub struct Dispatcher {
    gateway: Arc<dyn Gateway>,
    registry: Arc<RoutineRegistry>,
    config: DispatchConfig,
    offset: OffsetTracker,
}

impl Dispatcher {
    /// Creates a dispatcher starting at offset 0.
    pub fn new(
        gateway: Arc<dyn Gateway>,
        registry: Arc<RoutineRegistry>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            gateway,
            registry,
            config,
            offset: OffsetTracker::default(),
        }
    }

    /// Starts polling at `offset` instead of 0.
    pub fn with_initial_offset(mut self, offset: i64) -> Self {
        self.offset = OffsetTracker::new(offset);
        self
    }

    /// Handle to the live offset; stays valid after [`Dispatcher::run`] consumes the dispatcher.
    pub fn offset(&self) -> OffsetTracker {
        self.offset.clone()
    }

    /// Runs the pipeline until `shutdown` is cancelled.
    ///
    /// On cancellation the poller stops; batches already fetched are still acknowledged and
    /// dispatched, and all in-flight routines finish before this returns.
    #[instrument(skip_all, fields(max_concurrency = self.config.max_concurrency))]
    pub async fn run(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        self.config.validate()?;
        info!(
            offset = self.offset.current(),
            routines = self.registry.len(),
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Dispatcher started"
        );

        let (batch_tx, batch_rx) = mpsc::channel::<Vec<Update>>(self.config.queue_capacity);
        let (job_tx, job_rx) = mpsc::channel::<Message>(self.config.queue_capacity);

        let poller = tokio::spawn(poll_loop(
            self.gateway.clone(),
            self.offset.clone(),
            self.config.poll_interval,
            self.config.request_timeout,
            batch_tx,
            shutdown,
        ));
        let acknowledger = tokio::spawn(acknowledge_loop(self.offset.clone(), batch_rx, job_tx));

        let responder = Arc::new(Responder {
            gateway: self.gateway,
            registry: self.registry,
            request_timeout: self.config.request_timeout,
            echo_receipt: self.config.echo_receipt,
        });
        dispatch_loop(responder, job_rx, self.config.max_concurrency).await;

        poller.await?;
        acknowledger.await?;
        info!(offset = self.offset.current(), "Dispatcher stopped");
        Ok(())
    }
}

async fn poll_loop(
    gateway: Arc<dyn Gateway>,
    offset: OffsetTracker,
    poll_interval: Duration,
    request_timeout: Duration,
    batches: mpsc::Sender<Vec<Update>>,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let requested = offset.current();
        let fetched = tokio::select! {
            _ = shutdown.cancelled() => break,
            fetched = timeout(request_timeout, gateway.fetch_updates(requested)) => fetched,
        };
        let updates = match fetched {
            Ok(Ok(updates)) => updates,
            Ok(Err(e)) => {
                warn!(error = %e, offset = requested, "Error getting updates");
                continue;
            }
            Err(_) => {
                let e = BotError::GatewayUnavailable(format!(
                    "fetch timed out after {:?}",
                    request_timeout
                ));
                warn!(error = %e, offset = requested, "Error getting updates");
                continue;
            }
        };
        if updates.is_empty() {
            continue;
        }

        let target = updates
            .iter()
            .map(Update::next_offset)
            .max()
            .unwrap_or(requested);
        debug!(count = updates.len(), offset = requested, "fetched updates");

        // The acknowledger drains until this sender is dropped, so the send always completes.
        if batches.send(updates).await.is_err() {
            error!("acknowledge stage gone, stopping poller");
            break;
        }
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = offset.reached(target) => {}
        }
    }
    info!("poll loop stopped");
}

async fn acknowledge_loop(
    offset: OffsetTracker,
    mut batches: mpsc::Receiver<Vec<Update>>,
    jobs: mpsc::Sender<Message>,
) {
    while let Some(batch) = batches.recv().await {
        for update in batch {
            if update.sequence_id < offset.current() {
                debug!(update_id = update.sequence_id, "skipping already acknowledged update");
                continue;
            }
            let next = offset.acknowledge(update.sequence_id);
            let Some(message) = update.message else {
                debug!(update_id = update.sequence_id, offset = next, "update without message acknowledged");
                continue;
            };
            info!(
                update_id = update.sequence_id,
                offset = next,
                user_id = message.sender.id,
                chat_id = message.chat.id,
                message_content = %message.text,
                "Received message"
            );
            if jobs.send(message).await.is_err() {
                error!("dispatch stage gone, stopping acknowledger");
                return;
            }
        }
    }
    debug!("acknowledge loop stopped");
}

async fn dispatch_loop(
    responder: Arc<Responder>,
    mut jobs: mpsc::Receiver<Message>,
    max_concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(max_concurrency));
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            job = jobs.recv() => {
                let Some(message) = job else { break };
                let Ok(permit) = permits.clone().acquire_owned().await else { break };
                let responder = responder.clone();
                in_flight.spawn(async move {
                    responder.respond(message).await;
                    drop(permit);
                });
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                log_join(joined);
            }
        }
    }

    if !in_flight.is_empty() {
        info!(in_flight = in_flight.len(), "draining in-flight routines");
    }
    while let Some(joined) = in_flight.join_next().await {
        log_join(joined);
    }
}

fn log_join(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "routine task failed");
    }
}

/// Per-message route → execute → reply.
struct Responder {
    gateway: Arc<dyn Gateway>,
    registry: Arc<RoutineRegistry>,
    request_timeout: Duration,
    echo_receipt: bool,
}

impl Responder {
    #[instrument(skip_all, fields(chat_id = message.chat.id, message_id = %message.id))]
    async fn respond(&self, message: Message) {
        if self.echo_receipt {
            self.reply(&message, &format!("Received request: {}", message.text))
                .await;
        }
        let reply = reply_text(&self.registry, &message.text).await;
        self.reply(&message, &reply).await;
    }

    /// Replies to the message's chat with a deadline; failures are logged and dropped.
    async fn reply(&self, message: &Message, text: &str) {
        let chat_id = message.destination();
        match timeout(self.request_timeout, self.gateway.reply_to(message, text)).await {
            Ok(Ok(())) => debug!(chat_id, reply_len = text.len(), "step: reply sent"),
            Ok(Err(e)) => warn!(error = %e, chat_id, "unable to send message"),
            Err(_) => warn!(
                chat_id,
                timeout_ms = self.request_timeout.as_millis() as u64,
                "unable to send message: timed out"
            ),
        }
    }
}
