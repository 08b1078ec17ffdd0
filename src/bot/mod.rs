//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `command_router`: Parses message text into commands
//! - `command_dispatcher`: Runs commands and renders replies
//! - `basket_manager`: Basket and order transitions
//! - `catalog_manager`: Admin catalog changes
//! - `ui_builder`: Formats listings, receipts and payment links
//! - `message_handler`: Telegram endpoint

pub mod basket_manager;
pub mod catalog_manager;
pub mod command_dispatcher;
pub mod command_router;
pub mod message_handler;
pub mod ui_builder;

pub use command_dispatcher::ShopBot;
pub use command_router::{parse_command, Command};
pub use message_handler::message_handler;
