use bigdecimal::BigDecimal;

use super::errors::DomainError;
use super::money::{line_total, normalize_price, sum_money};

pub const MAX_CART_NOTES_LEN: usize = 255;

/// Upper bound for a single cart line, also enforced by a table constraint.
pub const MAX_LINE_QUANTITY: i32 = 9_999;

pub fn quantity_limit_error() -> DomainError {
    DomainError::validation(format!(
        "Quantity cannot exceed {} per cart line.",
        MAX_LINE_QUANTITY
    ))
}

/// A catalog entry as seen by the cart.
#[derive(Debug, Clone)]
pub struct CatalogModel {
    pub id: i32,
    pub name: String,
    pub estimated_price: Option<BigDecimal>,
}

/// A validated add-to-cart request with its price already resolved.
#[derive(Debug, Clone)]
pub struct CartLineInput {
    pub user_id: i32,
    pub model_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub notes: Option<String>,
}

/// A cart row joined with the live catalog.
#[derive(Debug, Clone)]
pub struct CartLineRecord {
    pub cart_item_id: i32,
    pub model_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub catalog_price: Option<BigDecimal>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CartLineView {
    pub cart_item_id: i32,
    pub model_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    pub catalog_price: Option<BigDecimal>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub user_id: i32,
    pub items: Vec<CartLineView>,
    pub totals: CartTotals,
}

impl CartView {
    pub fn from_records(user_id: i32, records: Vec<CartLineRecord>) -> Self {
        let items: Vec<CartLineView> = records
            .into_iter()
            .map(|r| {
                let unit_price = normalize_price(&r.unit_price);
                CartLineView {
                    cart_item_id: r.cart_item_id,
                    model_id: r.model_id,
                    name: r.name,
                    description: r.description,
                    preview_url: r.preview_url.or(r.thumbnail_url),
                    catalog_price: r.catalog_price.as_ref().map(normalize_price),
                    quantity: r.quantity,
                    line_total: line_total(r.quantity, &unit_price),
                    unit_price,
                    notes: r.notes,
                }
            })
            .collect();

        let totals = CartTotals {
            item_count: items.len(),
            total_quantity: items.iter().map(|i| i64::from(i.quantity)).sum(),
            subtotal: sum_money(items.iter().map(|i| &i.line_total)),
        };

        Self {
            user_id,
            items,
            totals,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Trims free text and caps it at `max_chars`; blank input becomes `None`.
pub fn clean_text(value: Option<&str>, max_chars: usize) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_chars).collect())
}
