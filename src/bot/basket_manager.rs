//! Basket Manager module for the customer-facing state transitions
//!
//! A user with no stored record is treated as having an empty basket and no
//! orders. Basket pushes and checkouts go to the store as single atomic
//! requests.

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::{CommandError, StoreError};
use crate::models::{Order, Product, UserProfile};
use crate::store::{CatalogStore, UserStore};

/// Create or refresh the user's record with an empty basket
pub async fn register_user<S: UserStore>(store: &S, profile: &UserProfile) -> Result<(), StoreError> {
    store.upsert_user(profile).await?;
    info!(user_id = profile.user_id, "User registered");
    Ok(())
}

/// Read the whole catalog
pub async fn list_catalog<S: CatalogStore>(store: &S) -> Result<Vec<Product>, StoreError> {
    store.list_products().await
}

/// Copy a catalog product into the user's basket
///
/// Returns the snapshot that was added.
pub async fn add_to_basket<S>(
    store: &S,
    profile: &UserProfile,
    name: &str,
) -> Result<Product, CommandError>
where
    S: UserStore + CatalogStore,
{
    let Some(product) = store.find_product(name).await? else {
        debug!(user_id = profile.user_id, product = %name, "Product not found for basket");
        return Err(CommandError::NotFound(name.to_string()));
    };

    store.push_to_basket(profile, &product).await?;
    info!(user_id = profile.user_id, product = %product.name, "Product added to basket");
    Ok(product)
}

/// Current basket contents, empty for unknown users
pub async fn view_basket<S: UserStore>(store: &S, user_id: i64) -> Result<Vec<Product>, StoreError> {
    Ok(store
        .get_user(user_id)
        .await?
        .map(|user| user.basket)
        .unwrap_or_default())
}

/// Turn the basket into an order
///
/// `None` means the basket was empty and nothing changed.
pub async fn checkout<S: UserStore>(store: &S, user_id: i64) -> Result<Option<Order>, StoreError> {
    let order = store.checkout(user_id, Utc::now()).await?;
    match &order {
        Some(order) => info!(
            user_id,
            items = order.items.len(),
            total = order.total,
            "Order placed"
        ),
        None => debug!(user_id, "Checkout requested with an empty basket"),
    }
    Ok(order)
}

/// Past orders, oldest first, empty for unknown users
pub async fn order_history<S: UserStore>(store: &S, user_id: i64) -> Result<Vec<Order>, StoreError> {
    Ok(store
        .get_user(user_id)
        .await?
        .map(|user| user.orders)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;

    #[tokio::test]
    async fn test_unknown_user_reads_as_empty() {
        let store = MemoryStore::new();
        assert!(view_basket(&store, 99).await.unwrap().is_empty());
        assert!(order_history(&store, 99).await.unwrap().is_empty());
        assert!(checkout(&store, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_to_basket_missing_product() {
        let store = MemoryStore::new();
        let profile = UserProfile::new(1);
        let result = add_to_basket(&store, &profile, "Tea").await;
        assert!(matches!(result, Err(CommandError::NotFound(name)) if name == "Tea"));
        assert!(store.get_user(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_to_basket_without_start_creates_record() {
        let store = MemoryStore::new();
        store.insert_product(&Product::new("Tea", 2.0)).await.unwrap();

        let profile = UserProfile::new(1).with_username("alice");
        let added = add_to_basket(&store, &profile, "Tea").await.unwrap();
        assert_eq!(added, Product::new("Tea", 2.0));
        assert_eq!(view_basket(&store, 1).await.unwrap(), vec![added]);
    }
}
