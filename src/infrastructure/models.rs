use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::cart::{CartLineRecord, CatalogModel};
use crate::domain::errors::DomainError;
use crate::domain::order::{decode_shipping_address, OrderRecord, StatusHistoryEntry};
use crate::schema::{cart_items, furniture_models, order_items, order_status_history, orders};

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = furniture_models)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FurnitureModelRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub estimated_price: Option<BigDecimal>,
    pub preview_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl From<FurnitureModelRow> for CatalogModel {
    fn from(row: FurnitureModelRow) -> Self {
        CatalogModel {
            id: row.id,
            name: row.name,
            estimated_price: row.estimated_price,
        }
    }
}

// ── Cart ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = cart_items)]
#[diesel(belongs_to(FurnitureModelRow, foreign_key = model_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItemRow {
    pub id: i32,
    pub user_id: i32,
    pub model_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_items)]
pub struct NewCartItemRow {
    pub user_id: i32,
    pub model_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub notes: Option<String>,
}

pub fn cart_line_record(item: CartItemRow, model: FurnitureModelRow) -> CartLineRecord {
    CartLineRecord {
        cart_item_id: item.id,
        model_id: item.model_id,
        name: model.name,
        description: model.description,
        preview_url: model.preview_url,
        thumbnail_url: model.thumbnail_url,
        catalog_price: model.estimated_price,
        quantity: item.quantity,
        unit_price: item.unit_price,
        notes: item.notes,
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: i32,
    pub status: String,
    pub total_amount: BigDecimal,
    pub shipping_address: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for OrderRecord {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            DomainError::Internal(format!(
                "order {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;

        Ok(OrderRecord {
            id: row.id,
            user_id: row.user_id,
            status,
            total_amount: row.total_amount,
            shipping_address: decode_shipping_address(row.shipping_address.as_deref()),
            payment_method: row.payment_method,
            payment_status: row.payment_status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub user_id: i32,
    pub status: String,
    pub total_amount: BigDecimal,
    pub shipping_address: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub model_id: i32,
    pub position: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub model_id: i32,
    pub position: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_status_history)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusHistoryRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<StatusHistoryRow> for StatusHistoryEntry {
    fn from(row: StatusHistoryRow) -> Self {
        StatusHistoryEntry {
            status: row.status,
            details: row.details,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_status_history)]
pub struct NewStatusHistoryRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: String,
    pub details: Option<String>,
}
