//! Wraps teloxide::Bot and implements [`rbot_core::Gateway`] via getUpdates and sendMessage.

use async_trait::async_trait;
use rbot_core::{BotError, Gateway, Result, ToCoreUpdate, ToCoreUser, Update, User};
use teloxide::{prelude::*, types::ChatId};
use tracing::debug;

use crate::adapters::{TelegramUpdateWrapper, TelegramUserWrapper};
use crate::config::TelegramConfig;

/// Telegram Bot API gateway.
pub struct TelegramGateway {
    bot: teloxide::Bot,
    long_poll_secs: u32,
}

impl TelegramGateway {
    /// Creates a gateway from an existing teloxide Bot; getUpdates returns immediately.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self {
            bot,
            long_poll_secs: 0,
        }
    }

    /// Builds the teloxide Bot from config (token, optional API URL, long-poll timeout).
    pub fn from_config(config: &TelegramConfig) -> anyhow::Result<Self> {
        let mut bot = teloxide::Bot::new(config.bot_token.clone());
        if let Some(url) = config.api_url()? {
            bot = bot.set_api_url(url);
        }
        Ok(Self::new(bot).with_long_poll_secs(config.long_poll_secs))
    }

    /// Server-side long-poll timeout for getUpdates. Keep it below the fetch deadline.
    pub fn with_long_poll_secs(mut self, secs: u32) -> Self {
        self.long_poll_secs = secs;
        self
    }

    /// The bot's own account (getMe). Validates the token.
    pub async fn identity(&self) -> Result<User> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| BotError::GatewayUnavailable(e.to_string()))?;
        Ok(TelegramUserWrapper(&me.user).to_core())
    }
}

/// Telegram offsets are 32-bit.
fn telegram_offset(offset: i64) -> Result<i32> {
    i32::try_from(offset).map_err(|_| {
        BotError::GatewayUnavailable(format!("update offset out of Telegram range: {}", offset))
    })
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn fetch_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let updates = self
            .bot
            .get_updates()
            .offset(telegram_offset(offset)?)
            .timeout(self.long_poll_secs)
            .await
            .map_err(|e| BotError::GatewayUnavailable(e.to_string()))?;
        debug!(offset, count = updates.len(), "getUpdates returned");
        Ok(updates
            .iter()
            .map(|u| TelegramUpdateWrapper(u).to_core())
            .collect())
    }

    async fn send_text(&self, destination: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(destination), text.to_string())
            .await
            .map_err(|e| BotError::GatewayUnavailable(e.to_string()))?;
        Ok(())
    }
}
