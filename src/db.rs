//! # Postgres Store
//!
//! Users are kept as one row each with the basket and order history stored
//! as JSONB arrays, mirroring a document store. Products live in their own
//! table with a unique name.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::models::{Order, Product, UserProfile, UserRecord};
use crate::store::{CatalogStore, ProductUpdate, UserStore};

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            user_id BIGINT PRIMARY KEY,
            username TEXT,
            first_name TEXT,
            last_name TEXT,
            basket JSONB NOT NULL DEFAULT '[]'::jsonb,
            orders JSONB NOT NULL DEFAULT '[]'::jsonb
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            price DOUBLE PRECISION NOT NULL CHECK (price >= 0)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create products table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Open a connection pool
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Undecodable JSONB documents are reported as corrupt data
fn decode_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::DataCorruption(e.to_string())
        }
        other => StoreError::Database(other),
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    basket: Json<Vec<Product>>,
    orders: Json<Vec<Order>>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            profile: UserProfile {
                user_id: row.user_id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
            },
            basket: row.basket.0,
            orders: row.orders.0,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    name: String,
    price: f64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::new(row.name, row.price)
    }
}

/// Store backed by a Postgres pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for PgStore {
    async fn upsert_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        debug!(user_id = profile.user_id, "Upserting user");

        sqlx::query(
            "INSERT INTO users (user_id, username, first_name, last_name)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                basket = '[]'::jsonb",
        )
        .bind(profile.user_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT user_id, username, first_name, last_name, basket, orders
             FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(decode_error)?;

        Ok(row.map(UserRecord::from))
    }

    async fn push_to_basket(
        &self,
        profile: &UserProfile,
        product: &Product,
    ) -> Result<(), StoreError> {
        debug!(user_id = profile.user_id, product = %product.name, "Pushing product to basket");

        sqlx::query(
            "INSERT INTO users (user_id, username, first_name, last_name, basket)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id) DO UPDATE SET basket = users.basket || EXCLUDED.basket",
        )
        .bind(profile.user_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(Json(vec![product.clone()]))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn checkout(
        &self,
        user_id: i64,
        placed_at: DateTime<Utc>,
    ) -> Result<Option<Order>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock held until commit; a concurrent push waits for us
        let basket: Option<Json<Vec<Product>>> =
            sqlx::query_scalar("SELECT basket FROM users WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(decode_error)?;

        let basket = match basket {
            Some(Json(items)) if !items.is_empty() => items,
            _ => {
                tx.rollback().await?;
                return Ok(None);
            }
        };

        let order = Order::from_basket(basket, placed_at);
        if !order.has_storable_total() {
            tx.rollback().await?;
            return Err(StoreError::DataCorruption(format!(
                "basket total for user {user_id} is not finite"
            )));
        }

        sqlx::query(
            "UPDATE users SET basket = '[]'::jsonb, orders = orders || $2
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(Json(vec![order.clone()]))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(order))
    }
}

impl CatalogStore for PgStore {
    async fn insert_product(&self, product: &Product) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO products (name, price) VALUES ($1, $2)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(&product.name)
        .bind(product.price)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT name, price FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_product(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT name, price FROM products WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn update_product(
        &self,
        old_name: &str,
        product: &Product,
    ) -> Result<ProductUpdate, StoreError> {
        let result = sqlx::query("UPDATE products SET name = $2, price = $3 WHERE name = $1")
            .bind(old_name)
            .bind(&product.name)
            .bind(product.price)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(ProductUpdate::Updated),
            Ok(_) => Ok(ProductUpdate::NotFound),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Ok(ProductUpdate::NameTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_product(&self, name: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
