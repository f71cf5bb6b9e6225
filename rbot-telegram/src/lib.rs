//! # rbot-telegram
//!
//! Telegram transport for the routine bot: teloxide → core adapters, a [`rbot_core::Gateway`]
//! implementation over getUpdates/sendMessage, and minimal connectivity config.
//! No routing or dispatch logic lives here.

mod adapters;
mod config;
mod gateway;

pub use adapters::{TelegramMessageWrapper, TelegramUpdateWrapper, TelegramUserWrapper};
pub use config::{read_token_file, TelegramConfig};
pub use gateway::TelegramGateway;
