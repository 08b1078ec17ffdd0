//! Command Dispatcher module tying parsing, permissions, state changes and
//! reply rendering together

use tracing::{debug, error, warn};
use url::Url;

use crate::bot::basket_manager;
use crate::bot::catalog_manager::{execute_admin_command, CatalogChange};
use crate::bot::command_router::{parse_command, Command};
use crate::bot::ui_builder::{
    format_order_history, format_price, format_product_listing, payment_link,
};
use crate::errors::CommandError;
use crate::localization::LocalizationManager;
use crate::models::UserProfile;
use crate::permissions::AdminList;
use crate::store::{CatalogStore, UserStore};

/// The shop bot's command processor
///
/// Holds no per-user state; everything lives in the store, so one instance
/// serves all conversations concurrently.
#[derive(Debug)]
pub struct ShopBot<S> {
    store: S,
    admins: AdminList,
    payment_gateway: Url,
    l10n: LocalizationManager,
}

impl<S> ShopBot<S>
where
    S: UserStore + CatalogStore,
{
    pub fn new(store: S, admins: AdminList, payment_gateway: Url, l10n: LocalizationManager) -> Self {
        Self {
            store,
            admins,
            payment_gateway,
            l10n,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Answer a text message; `None` when the text is not a known command
    pub async fn handle_text(&self, sender: &UserProfile, text: &str) -> Option<String> {
        let Some(command) = parse_command(text) else {
            debug!(user_id = sender.user_id, "Ignoring non-command text");
            return None;
        };
        Some(self.execute(sender, command).await)
    }

    /// Run a parsed command and render the reply
    pub async fn execute(&self, sender: &UserProfile, command: Command) -> String {
        debug!(user_id = sender.user_id, command = ?command, "Executing command");

        match self.run(sender, command).await {
            Ok(reply) => reply,
            Err(e) => self.render_error(sender, &e),
        }
    }

    async fn run(&self, sender: &UserProfile, command: Command) -> Result<String, CommandError> {
        let l10n = &self.l10n;

        let reply = match command {
            Command::Start => {
                basket_manager::register_user(&self.store, sender).await?;
                l10n.t("welcome")
            }
            Command::Products => {
                let products = basket_manager::list_catalog(&self.store).await?;
                format_product_listing(&products, "products-title", "products-empty", l10n)
            }
            Command::AddToBasket { name } => {
                let product = basket_manager::add_to_basket(&self.store, sender, &name).await?;
                l10n.t_args("basket-added", &[("name", product.name)])
            }
            Command::ViewBasket => {
                let basket = basket_manager::view_basket(&self.store, sender.user_id).await?;
                format_product_listing(&basket, "basket-title", "basket-empty", l10n)
            }
            Command::Checkout => match basket_manager::checkout(&self.store, sender.user_id).await? {
                Some(order) => l10n.t_args(
                    "checkout-placed",
                    &[
                        ("total", format_price(order.total)),
                        ("link", payment_link(&self.payment_gateway, &order).to_string()),
                    ],
                ),
                None => l10n.t("checkout-empty"),
            },
            Command::Orders => {
                let orders = basket_manager::order_history(&self.store, sender.user_id).await?;
                format_order_history(&orders, l10n)
            }
            Command::Help => {
                if self.admins.is_admin(sender.username.as_deref()) {
                    format!("{}\n\n{}", l10n.t("help-customer"), l10n.t("help-admin"))
                } else {
                    l10n.t("help-customer")
                }
            }
            Command::Admin { action, parsed } => {
                let change =
                    execute_admin_command(&self.store, &self.admins, sender, action, parsed).await?;
                self.render_change(change)
            }
        };

        Ok(reply)
    }

    fn render_change(&self, change: CatalogChange) -> String {
        match change {
            CatalogChange::Added(product) => self.l10n.t_args(
                "admin-product-added",
                &[
                    ("name", product.name),
                    ("price", format_price(product.price)),
                ],
            ),
            CatalogChange::Updated { old_name, product } => self.l10n.t_args(
                "admin-product-updated",
                &[
                    ("old", old_name),
                    ("name", product.name),
                    ("price", format_price(product.price)),
                ],
            ),
            CatalogChange::Removed(name) => {
                self.l10n.t_args("admin-product-removed", &[("name", name)])
            }
        }
    }

    fn render_error(&self, sender: &UserProfile, err: &CommandError) -> String {
        match err {
            CommandError::Validation(e) => {
                warn!(user_id = sender.user_id, error = %e, "Rejected malformed command");
                self.l10n.t_args("error-validation", &[("msg", e.to_string())])
            }
            CommandError::NotFound(name) => {
                self.l10n.t_args("product-not-found", &[("name", name.clone())])
            }
            CommandError::AlreadyExists(name) => {
                self.l10n.t_args("admin-product-exists", &[("name", name.clone())])
            }
            CommandError::PermissionDenied => self.l10n.t("permission-denied"),
            CommandError::Store(e) => {
                error!(user_id = sender.user_id, error = %e, "Store failure while handling command");
                self.l10n.t("error-store")
            }
        }
    }
}
