//! Error types for the bot core.
//!
//! [`BotError`] covers infrastructure failures; [`RoutineError`] covers routine lookup,
//! argument casting, handler failures and registration problems. The display text of a
//! [`RoutineError`] is what the chat user sees as a reply.

use thiserror::Error;

use crate::types::ParamKind;

/// Top-level error (gateway transport, routine).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error("Routine error: {0}")]
    Routine(#[from] RoutineError),
}

/// Errors produced while registering, resolving or executing a routine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutineError {
    #[error("routine not found")]
    RoutineNotFound,

    #[error("wrong number of args. Given: {given}, Takes: {takes}")]
    ArityMismatch { given: usize, takes: usize },

    #[error("wrong type of args: argument {position} must be {expected}, got {token:?}")]
    TypeMismatch {
        position: usize,
        expected: ParamKind,
        token: String,
    },

    #[error("{0}")]
    Handler(String),

    #[error("couldn't register routine: name taken: {0}")]
    NameTaken(String),

    #[error("couldn't register routine: invalid name: {0:?}")]
    InvalidName(String),

    #[error("routine has unsupported param type: {0}")]
    UnsupportedParamKind(String),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
