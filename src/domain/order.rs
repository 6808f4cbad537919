use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use super::errors::DomainError;
use super::money::{line_total, normalize_price, sum_money};

pub const PAYMENT_PENDING: &str = "pending";
pub const ORDER_CREATED_DETAILS: &str = "Order created successfully.";
pub const MAX_PAYMENT_METHOD_LEN: usize = 100;

/// Canonical lifecycle stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    OrderPlaced,
    PaymentConfirmed,
    Shipped,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::OrderPlaced,
        OrderStatus::PaymentConfirmed,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::OrderPlaced => "order_placed",
            OrderStatus::PaymentConfirmed => "payment_confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::OrderPlaced => "Order Placed",
            OrderStatus::PaymentConfirmed => "Payment Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }

    pub fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown order status '{s}'.")))
    }
}

// ── Shipping address ─────────────────────────────────────────────────────────

/// Serializes a client-supplied shipping address for storage.
///
/// Objects are stored as JSON, non-blank strings are wrapped as
/// `{"text": ...}`, everything else is dropped.
pub fn encode_shipping_address(input: Option<&Value>) -> Option<String> {
    let value = input?;
    match value {
        Value::Object(_) => serde_json::to_string(value).ok(),
        Value::String(s) if !s.trim().is_empty() => Some(json!({ "text": s.trim() }).to_string()),
        _ => None,
    }
}

/// Reads a stored shipping address; unparseable text becomes `{"text": raw}`.
pub fn decode_shipping_address(stored: Option<&str>) -> Option<Value> {
    let raw = stored?;
    if raw.is_empty() {
        return None;
    }
    Some(serde_json::from_str(raw).unwrap_or_else(|_| json!({ "text": raw })))
}

// ── Checkout ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: i32,
    pub shipping_address: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// A locked cart row as read inside the checkout transaction.
#[derive(Debug, Clone)]
pub struct CartSnapshotLine {
    pub model_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub model_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total_amount: BigDecimal,
}

/// Freezes cart lines into order lines. Fails on an empty cart.
pub fn price_cart(lines: &[CartSnapshotLine]) -> Result<PricedCart, DomainError> {
    if lines.is_empty() {
        return Err(DomainError::validation("Cart is empty."));
    }

    let lines: Vec<PricedLine> = lines
        .iter()
        .map(|l| {
            let unit_price = normalize_price(&l.unit_price);
            PricedLine {
                model_id: l.model_id,
                quantity: l.quantity.max(1),
                line_total: line_total(l.quantity.max(1), &unit_price),
                unit_price,
            }
        })
        .collect();
    let total_amount = sum_money(lines.iter().map(|l| &l.line_total));

    Ok(PricedCart {
        lines,
        total_amount,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub status: OrderStatus,
}

// ── Read side ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub id: Uuid,
    pub user_id: i32,
    pub status: OrderStatus,
    pub total_amount: BigDecimal,
    pub shipping_address: Option<Value>,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub model_id: i32,
    pub name: String,
    pub preview_url: Option<String>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct StatusHistoryEntry {
    pub status: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An order with its items and raw history, before timeline projection.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: OrderRecord,
    pub items: Vec<OrderItemView>,
    pub history: Vec<StatusHistoryEntry>,
}

#[derive(Debug, Clone)]
pub struct StatusChange {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub details: Option<String>,
}
