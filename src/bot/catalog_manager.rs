//! Catalog Manager module for the admin-only catalog commands

use tracing::{info, warn};

use crate::bot::command_router::{AdminAction, AdminCommand};
use crate::errors::{ArgError, CommandError};
use crate::models::{Product, UserProfile};
use crate::permissions::AdminList;
use crate::store::{CatalogStore, ProductUpdate};

/// Successful admin mutation
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogChange {
    Added(Product),
    Updated { old_name: String, product: Product },
    Removed(String),
}

/// Run an admin command
///
/// The permission check comes first: a non-admin gets a denial whatever the
/// arguments were, and nothing else is evaluated.
pub async fn execute_admin_command<S: CatalogStore>(
    store: &S,
    admins: &AdminList,
    sender: &UserProfile,
    action: AdminAction,
    parsed: Result<AdminCommand, ArgError>,
) -> Result<CatalogChange, CommandError> {
    if !admins.is_admin(sender.username.as_deref()) {
        warn!(
            user_id = sender.user_id,
            username = ?sender.username,
            action = ?action,
            "Admin command refused"
        );
        return Err(CommandError::PermissionDenied);
    }

    match parsed? {
        AdminCommand::AddProduct(product) => add_product(store, product).await,
        AdminCommand::EditProduct { old_name, product } => {
            edit_product(store, old_name, product).await
        }
        AdminCommand::RemoveProduct { name } => remove_product(store, name).await,
    }
}

async fn add_product<S: CatalogStore>(store: &S, product: Product) -> Result<CatalogChange, CommandError> {
    if !store.insert_product(&product).await? {
        return Err(CommandError::AlreadyExists(product.name));
    }
    info!(product = %product.name, price = product.price, "Product added to catalog");
    Ok(CatalogChange::Added(product))
}

async fn edit_product<S: CatalogStore>(
    store: &S,
    old_name: String,
    product: Product,
) -> Result<CatalogChange, CommandError> {
    match store.update_product(&old_name, &product).await? {
        ProductUpdate::Updated => {
            info!(old_name = %old_name, product = %product.name, price = product.price, "Product updated");
            Ok(CatalogChange::Updated { old_name, product })
        }
        ProductUpdate::NotFound => Err(CommandError::NotFound(old_name)),
        ProductUpdate::NameTaken => Err(CommandError::AlreadyExists(product.name)),
    }
}

async fn remove_product<S: CatalogStore>(store: &S, name: String) -> Result<CatalogChange, CommandError> {
    if !store.remove_product(&name).await? {
        return Err(CommandError::NotFound(name));
    }
    info!(product = %name, "Product removed from catalog");
    Ok(CatalogChange::Removed(name))
}
