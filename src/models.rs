//! # Shop Data Model
//!
//! Users own a basket and an order history. Products are copied by value
//! into baskets and orders, so later catalog edits never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest price the catalog accepts
///
/// Keeps basket totals finite so orders always serialize to valid JSON.
pub const MAX_PRICE: f64 = 1_000_000_000.0;

/// A catalog entry, also used as the snapshot stored in baskets and orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Lookup key, matched exactly and case-sensitively
    pub name: String,
    /// Non-negative unit price
    pub price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// An immutable checked-out basket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub items: Vec<Product>,
    /// Sum of item prices at checkout time
    pub total: f64,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Build an order from a basket snapshot, computing its total
    pub fn from_basket(items: Vec<Product>, placed_at: DateTime<Utc>) -> Self {
        let total = basket_total(&items);
        Self {
            items,
            total,
            placed_at,
        }
    }

    /// JSON has no encoding for infinity or NaN, so only finite totals can be stored
    pub fn has_storable_total(&self) -> bool {
        self.total.is_finite()
    }
}

/// Sum the prices of a basket
pub fn basket_total(items: &[Product]) -> f64 {
    items.iter().map(|item| item.price).sum()
}

/// Sender identity as resolved by the chat transport
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserProfile {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// A full user document as held by the store
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub profile: UserProfile,
    pub basket: Vec<Product>,
    pub orders: Vec<Order>,
}

impl UserRecord {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            basket: Vec::new(),
            orders: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basket_total() {
        let items = vec![
            Product::new("Tea", 9.99),
            Product::new("Mug", 5.00),
            Product::new("Sticker", 0.01),
        ];
        assert!((basket_total(&items) - 15.00).abs() < 1e-9);
        assert_eq!(basket_total(&[]), 0.0);
    }

    #[test]
    fn test_order_from_basket_keeps_items() {
        let items = vec![Product::new("Tea", 2.5), Product::new("Tea", 2.5)];
        let order = Order::from_basket(items.clone(), Utc::now());
        assert_eq!(order.items, items);
        assert!((order.total - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflowing_total_is_not_storable() {
        let items = vec![Product::new("Yacht", 1e308), Product::new("Yacht", 1e308)];
        let order = Order::from_basket(items, Utc::now());
        assert!(!order.has_storable_total());

        let order = Order::from_basket(vec![Product::new("Tea", MAX_PRICE)], Utc::now());
        assert!(order.has_storable_total());
        let json = serde_json::to_string(&order).unwrap();
        let decoded: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.total, MAX_PRICE);
    }

    #[test]
    fn test_product_serialization_shape() {
        let json = serde_json::to_value(Product::new("Tea", 1.5)).unwrap();
        assert_eq!(json["name"], "Tea");
        assert_eq!(json["price"], 1.5);
    }
}
