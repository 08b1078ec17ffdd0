//! # Store Interfaces
//!
//! The two document collections the shop relies on. Per-user mutations are
//! single atomic requests so concurrent messages from one user cannot lose
//! updates.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::errors::StoreError;
use crate::models::{Order, Product, UserProfile, UserRecord};

/// Result of a catalog update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductUpdate {
    Updated,
    NotFound,
    /// The new name belongs to another product
    NameTaken,
}

/// Users collection, keyed by `user_id`
pub trait UserStore: Send + Sync {
    /// Create or refresh the user record; resets the basket, keeps orders
    fn upsert_user(
        &self,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Full document read
    fn get_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;

    /// Append a product snapshot to the basket, creating the record if needed
    fn push_to_basket(
        &self,
        profile: &UserProfile,
        product: &Product,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Move the basket into a new order in one atomic step
    ///
    /// Returns `None` and leaves the record untouched when the basket is
    /// empty or the user is unknown.
    fn checkout(
        &self,
        user_id: i64,
        placed_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Order>, StoreError>> + Send;
}

/// Products collection, keyed by exact name
pub trait CatalogStore: Send + Sync {
    /// Insert a product; returns `false` if the name is already taken
    fn insert_product(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// All products in insertion order
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    fn find_product(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Product>, StoreError>> + Send;

    /// Replace name and price of the product called `old_name`
    fn update_product(
        &self,
        old_name: &str,
        product: &Product,
    ) -> impl Future<Output = Result<ProductUpdate, StoreError>> + Send;

    /// Delete a product; returns `false` if none matched
    fn remove_product(&self, name: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;
}
