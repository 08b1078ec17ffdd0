//! In-process store used by tests and for running without a database

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::StoreError;
use crate::models::{Order, Product, UserProfile, UserRecord};
use crate::store::{CatalogStore, ProductUpdate, UserStore};

#[derive(Debug, Default)]
struct Documents {
    users: HashMap<i64, UserRecord>,
    products: Vec<Product>,
}

/// Both collections behind a single lock
///
/// Every operation takes the lock once, which makes each call atomic in the
/// same way a single store request is.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Documents>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn documents(&self) -> Result<MutexGuard<'_, Documents>, StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        self.documents
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {e}")))
    }
}

impl UserStore for MemoryStore {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let mut docs = self.documents()?;
        docs.users
            .entry(profile.user_id)
            .and_modify(|user| {
                user.profile = profile.clone();
                user.basket.clear();
            })
            .or_insert_with(|| UserRecord::new(profile.clone()));
        Ok(())
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>, StoreError> {
        let docs = self.documents()?;
        Ok(docs.users.get(&user_id).cloned())
    }

    async fn push_to_basket(
        &self,
        profile: &UserProfile,
        product: &Product,
    ) -> Result<(), StoreError> {
        let mut docs = self.documents()?;
        docs.users
            .entry(profile.user_id)
            .or_insert_with(|| UserRecord::new(profile.clone()))
            .basket
            .push(product.clone());
        Ok(())
    }

    async fn checkout(
        &self,
        user_id: i64,
        placed_at: DateTime<Utc>,
    ) -> Result<Option<Order>, StoreError> {
        let mut docs = self.documents()?;
        let Some(user) = docs.users.get_mut(&user_id) else {
            return Ok(None);
        };
        if user.basket.is_empty() {
            return Ok(None);
        }

        let order = Order::from_basket(user.basket.clone(), placed_at);
        if !order.has_storable_total() {
            return Err(StoreError::DataCorruption(format!(
                "basket total for user {user_id} is not finite"
            )));
        }
        user.basket.clear();
        user.orders.push(order.clone());
        debug!(user_id, orders = user.orders.len(), "Basket moved to order history");
        Ok(Some(order))
    }
}

impl CatalogStore for MemoryStore {
    async fn insert_product(&self, product: &Product) -> Result<bool, StoreError> {
        let mut docs = self.documents()?;
        if docs.products.iter().any(|p| p.name == product.name) {
            return Ok(false);
        }
        docs.products.push(product.clone());
        Ok(true)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.documents()?.products.clone())
    }

    async fn find_product(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let docs = self.documents()?;
        Ok(docs.products.iter().find(|p| p.name == name).cloned())
    }

    async fn update_product(
        &self,
        old_name: &str,
        product: &Product,
    ) -> Result<ProductUpdate, StoreError> {
        let mut docs = self.documents()?;
        let Some(index) = docs.products.iter().position(|p| p.name == old_name) else {
            return Ok(ProductUpdate::NotFound);
        };
        let name_taken = docs
            .products
            .iter()
            .enumerate()
            .any(|(i, p)| i != index && p.name == product.name);
        if name_taken {
            return Ok(ProductUpdate::NameTaken);
        }
        if let Some(slot) = docs.products.get_mut(index) {
            *slot = product.clone();
        }
        Ok(ProductUpdate::Updated)
    }

    async fn remove_product(&self, name: &str) -> Result<bool, StoreError> {
        let mut docs = self.documents()?;
        match docs.products.iter().position(|p| p.name == name) {
            Some(index) => {
                docs.products.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
