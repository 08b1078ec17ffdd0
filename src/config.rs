//! # Configuration Module
//!
//! Startup configuration read once from the environment. A `.env` file is
//! loaded by `main` before `BotConfig::from_env` runs.

use anyhow::{anyhow, Context, Result};
use url::Url;

use crate::permissions::AdminList;

pub const DEFAULT_PAYMENT_GATEWAY_URL: &str = "http://yourpaymentgateway.com/pay";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// Postgres connection string
    pub database_url: String,
    /// Usernames allowed to manage the catalog
    pub admins: AdminList,
    /// Base URL that payment links are built on
    pub payment_gateway_url: Url,
    /// Connection pool size
    pub max_connections: u32,
}

impl BotConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let admins = AdminList::new(parse_admin_usernames(
            lookup("ADMIN_USERNAMES").as_deref().unwrap_or_default(),
        ));

        let gateway = lookup("PAYMENT_GATEWAY_URL")
            .unwrap_or_else(|| DEFAULT_PAYMENT_GATEWAY_URL.to_string());
        let payment_gateway_url = Url::parse(gateway.trim())
            .with_context(|| format!("PAYMENT_GATEWAY_URL is not a valid URL: {gateway}"))?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {value}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            bot_token,
            database_url,
            admins,
            payment_gateway_url,
            max_connections,
        })
    }
}

/// Split a comma-separated admin list, dropping blanks and a leading `@`
pub fn parse_admin_usernames(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|name| name.trim().trim_start_matches('@'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_admin_usernames() {
        assert_eq!(
            parse_admin_usernames(" alice, @bob ,,carol "),
            vec!["alice", "bob", "carol"]
        );
        assert!(parse_admin_usernames("").is_empty());
        assert!(parse_admin_usernames(" , ").is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://localhost/shop"),
        ]))
        .unwrap();

        assert_eq!(config.bot_token, "token");
        assert!(config.admins.is_empty());
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(
            config.payment_gateway_url.as_str(),
            DEFAULT_PAYMENT_GATEWAY_URL
        );
    }

    #[test]
    fn test_config_admins_and_overrides() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "postgres://localhost/shop"),
            ("ADMIN_USERNAMES", "alice,@bob"),
            ("PAYMENT_GATEWAY_URL", "https://pay.example.com/checkout"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();

        assert!(config.admins.is_admin(Some("alice")));
        assert!(config.admins.is_admin(Some("bob")));
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.payment_gateway_url.host_str(), Some("pay.example.com"));
    }

    #[test]
    fn test_config_missing_required_values() {
        assert!(BotConfig::from_lookup(lookup_from(&[("DATABASE_URL", "x")])).is_err());
        assert!(BotConfig::from_lookup(lookup_from(&[("TELEGRAM_BOT_TOKEN", "x")])).is_err());
        assert!(BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", " "),
            ("DATABASE_URL", "x"),
        ]))
        .is_err());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let bad_url = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "x"),
            ("PAYMENT_GATEWAY_URL", "not a url"),
        ]));
        assert!(bad_url.is_err());

        let bad_pool = BotConfig::from_lookup(lookup_from(&[
            ("TELEGRAM_BOT_TOKEN", "token"),
            ("DATABASE_URL", "x"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
        ]));
        assert!(bad_pool.is_err());
    }
}
