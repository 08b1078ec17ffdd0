//! UI Builder module for formatting listings and receipts

use url::Url;

use crate::localization::LocalizationManager;
use crate::models::{Order, Product};

/// Render a price with two decimals
pub fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

/// Format products as a 1-indexed `name - price` list
pub fn format_product_lines(products: &[Product], l10n: &LocalizationManager) -> String {
    products
        .iter()
        .enumerate()
        .map(|(i, product)| {
            l10n.t_args(
                "product-line",
                &[
                    ("index", (i + 1).to_string()),
                    ("name", product.name.clone()),
                    ("price", format_price(product.price)),
                ],
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a titled product listing, or the empty message if there is nothing to show
pub fn format_product_listing(
    products: &[Product],
    title_key: &str,
    empty_key: &str,
    l10n: &LocalizationManager,
) -> String {
    if products.is_empty() {
        return l10n.t(empty_key);
    }
    format!("{}\n{}", l10n.t(title_key), format_product_lines(products, l10n))
}

/// Format the order history
pub fn format_order_history(orders: &[Order], l10n: &LocalizationManager) -> String {
    if orders.is_empty() {
        return l10n.t("orders-empty");
    }

    let lines = orders
        .iter()
        .enumerate()
        .map(|(i, order)| {
            l10n.t_args(
                "order-line",
                &[
                    ("index", (i + 1).to_string()),
                    ("count", order.items.len().to_string()),
                    ("total", format_price(order.total)),
                    ("date", order.placed_at.format("%Y-%m-%d %H:%M UTC").to_string()),
                ],
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{}", l10n.t("orders-title"), lines)
}

/// Build the payment link for an order: its total, then one `product` pair per item
pub fn payment_link(gateway: &Url, order: &Order) -> Url {
    let mut link = gateway.clone();
    {
        let mut query = link.query_pairs_mut();
        query.append_pair("amount", &format_price(order.total));
        for item in &order.items {
            query.append_pair("product", &item.name);
        }
    }
    link
}
