//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::User;
use tracing::debug;

use crate::models::UserProfile;
use crate::store::{CatalogStore, UserStore};

use super::command_dispatcher::ShopBot;

/// Map the Telegram sender onto the shop's user identity
pub fn profile_from_user(user: &User) -> UserProfile {
    UserProfile {
        user_id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()).filter(|name| !name.is_empty()),
        last_name: user.last_name.clone(),
    }
}

pub async fn message_handler<S>(bot: Bot, msg: Message, shop: Arc<ShopBot<S>>) -> Result<()>
where
    S: UserStore + CatalogStore + 'static,
{
    let Some(text) = msg.text() else {
        debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };

    let Some(sender) = msg.from.as_ref().map(profile_from_user) else {
        debug!(chat_id = %msg.chat.id, "Ignoring message without a sender");
        return Ok(());
    };

    if let Some(reply) = shop.handle_text(&sender, text).await {
        bot.send_message(msg.chat.id, reply).await?;
    }

    Ok(())
}
