//! # rbot-core
//!
//! Core types and traits for the routine bot: [`Gateway`], [`Update`], [`Message`], the
//! routine argument model ([`ParamKind`], [`ArgValue`]), error taxonomy and tracing
//! initialization. Transport-agnostic; used by routine-registry, rbot-dispatch and rbot-telegram.

pub mod error;
pub mod gateway;
pub mod logger;
pub mod types;

pub use error::{BotError, Result, RoutineError};
pub use gateway::Gateway;
pub use logger::init_tracing;
pub use types::{
    ArgValue, Chat, Message, ParamKind, ToCoreMessage, ToCoreUpdate, ToCoreUser, Update, User,
};
