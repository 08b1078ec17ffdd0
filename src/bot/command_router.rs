//! Command Router module for turning message text into a `Command`
//!
//! Parsing happens once; each variant carries its already validated
//! arguments. Text that is not one of the known commands yields `None` and
//! is ignored by the bot.

use regex::Regex;
use std::sync::LazyLock;

use crate::errors::ArgError;
use crate::models::{Product, MAX_PRICE};

// `/name`, optional `@botname` suffix, optional argument string
static COMMAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^/([A-Za-z_]+)(?:@\w+)?(?:\s+(.*))?$").expect("command pattern should be valid")
});

/// Admin commands, gated by the allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    AddProduct,
    EditProduct,
    RemoveProduct,
}

/// Validated payload of an admin command
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    AddProduct(Product),
    EditProduct { old_name: String, product: Product },
    RemoveProduct { name: String },
}

/// Every command the bot answers to
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Products,
    AddToBasket { name: String },
    ViewBasket,
    Checkout,
    Orders,
    Help,
    /// Argument errors are kept so they are reported only after the
    /// permission check
    Admin {
        action: AdminAction,
        parsed: Result<AdminCommand, ArgError>,
    },
}

/// Parse an inbound message
pub fn parse_command(text: &str) -> Option<Command> {
    let captures = COMMAND_PATTERN.captures(text.trim())?;
    let name = captures.get(1)?.as_str();
    let args = captures.get(2).map_or("", |m| m.as_str().trim());

    let command = match name {
        "start" => Command::Start,
        "products" => Command::Products,
        "add_to_basket" => {
            if args.is_empty() {
                return None;
            }
            Command::AddToBasket {
                name: args.to_string(),
            }
        }
        "view_basket" => Command::ViewBasket,
        "checkout" => Command::Checkout,
        "orders" => Command::Orders,
        "help" => Command::Help,
        "admin_add_product" => Command::Admin {
            action: AdminAction::AddProduct,
            parsed: parse_add_product(args),
        },
        "admin_edit_product" => Command::Admin {
            action: AdminAction::EditProduct,
            parsed: parse_edit_product(args),
        },
        "admin_remove_product" => Command::Admin {
            action: AdminAction::RemoveProduct,
            parsed: parse_remove_product(args),
        },
        _ => return None,
    };

    Some(command)
}

/// Split a comma-separated argument string into exactly `expected` trimmed fields
fn split_fields(args: &str, expected: usize) -> Result<Vec<&str>, ArgError> {
    let fields: Vec<&str> = if args.is_empty() {
        Vec::new()
    } else {
        args.split(',').map(str::trim).collect()
    };

    if fields.len() != expected {
        return Err(ArgError::WrongArity {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn non_empty<'a>(field: Option<&'a str>, label: &'static str) -> Result<&'a str, ArgError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ArgError::EmptyField(label)),
    }
}

/// Parse a price: non-negative and at most `MAX_PRICE`
pub fn parse_price(raw: &str) -> Result<f64, ArgError> {
    match raw.trim().parse::<f64>() {
        Ok(price) if (0.0..=MAX_PRICE).contains(&price) => Ok(price),
        _ => Err(ArgError::InvalidPrice(raw.trim().to_string())),
    }
}

fn parse_add_product(args: &str) -> Result<AdminCommand, ArgError> {
    let fields = split_fields(args, 2)?;
    let name = non_empty(fields.first().copied(), "name")?;
    let price = parse_price(non_empty(fields.get(1).copied(), "price")?)?;
    Ok(AdminCommand::AddProduct(Product::new(name, price)))
}

fn parse_edit_product(args: &str) -> Result<AdminCommand, ArgError> {
    let fields = split_fields(args, 3)?;
    let old_name = non_empty(fields.first().copied(), "old name")?;
    let new_name = non_empty(fields.get(1).copied(), "new name")?;
    let price = parse_price(non_empty(fields.get(2).copied(), "price")?)?;
    Ok(AdminCommand::EditProduct {
        old_name: old_name.to_string(),
        product: Product::new(new_name, price),
    })
}

fn parse_remove_product(args: &str) -> Result<AdminCommand, ArgError> {
    if args.is_empty() {
        return Err(ArgError::EmptyField("name"));
    }
    Ok(AdminCommand::RemoveProduct {
        name: args.to_string(),
    })
}
