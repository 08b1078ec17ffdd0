use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shopbot::bot::{message_handler, ShopBot};
use shopbot::config::BotConfig;
use shopbot::db::{self, PgStore};
use shopbot::localization::LocalizationManager;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting Shop Telegram Bot");

    let config = BotConfig::from_env().context("Invalid configuration")?;
    info!(admins = config.admins.len(), "Configuration loaded");

    let pool = db::connect(&config.database_url, config.max_connections).await?;
    db::init_database_schema(&pool).await?;

    let l10n = LocalizationManager::new().context("Failed to load message catalog")?;
    let shop = Arc::new(ShopBot::new(
        PgStore::new(pool),
        config.admins,
        config.payment_gateway_url,
        l10n,
    ));

    let bot = Bot::new(config.bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = Update::filter_message().endpoint(message_handler::<PgStore>);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![shop])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
