//! # Shop Telegram Bot
//!
//! A Telegram bot that keeps a per-user basket and order history on top of
//! a shared product catalog, with catalog management restricted to
//! configured administrators.

pub mod bot;
pub mod config;
pub mod db;
pub mod errors;
pub mod localization;
pub mod memory_store;
pub mod models;
pub mod permissions;
pub mod store;
