//! # rbot-dispatch
//!
//! Turns a stream of gateway updates into executed routines: polls on a fixed interval,
//! acknowledges every update before it is handled (at-most-once delivery to routines),
//! routes each message by its first word and replies with the routine's result or error text.

mod config;
mod dispatcher;
mod offset;
pub mod route;

pub use config::{
    DispatchConfig, DEFAULT_MAX_CONCURRENCY, DEFAULT_POLL_INTERVAL, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use dispatcher::Dispatcher;
pub use offset::OffsetTracker;
pub use tokio_util::sync::CancellationToken;
