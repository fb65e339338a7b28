use anyhow::Context;
use reqwest::Client;

use crate::application::config::TelegramConfig;
use crate::infrastructure::notifications::telegram::TelegramClient;

/// Build the bot client. The bot is the whole point of the `bot` command, so
/// a missing token is fatal here rather than a disabled channel.
///
/// # Errors
///
/// Returns an error if `bot_token` is not configured.
pub fn bot_client(config: &TelegramConfig, client: Client) -> anyhow::Result<TelegramClient> {
    TelegramClient::from_config(config, client)
        .context("Telegram bot requires TELEGRAM_BOT_TOKEN or [notifications.telegram].bot_token")
}
