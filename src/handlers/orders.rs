use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::{Checkout, OrderOverview, OrderService};
use crate::domain::access::Caller;
use crate::domain::order::{OrderItemView, OrderRecord};
use crate::domain::timeline::TimelineStep;
use crate::errors::AppError;
use crate::infrastructure::order_repo::DieselOrderRepository;

pub type Orders = OrderService<DieselOrderRepository>;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: Option<i32>,
    /// A structured address object, or free text.
    #[schema(value_type = Option<Object>)]
    pub shipping_address: Option<Value>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_id: Uuid,
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of order_placed, payment_confirmed, shipped, out_for_delivery, delivered.
    pub status: String,
    pub details: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub order_item_id: Uuid,
    pub model_id: i32,
    pub name: String,
    pub preview_url: Option<String>,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: i32,
    pub status: String,
    pub total_amount: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[schema(value_type = Option<Object>)]
    pub shipping_address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItemResponse>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStepResponse {
    pub status: String,
    pub label: String,
    pub timestamp: Option<String>,
    pub details: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: OrderResponse,
    pub timeline: Vec<TimelineStepResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub success: bool,
    pub user_id: i32,
    pub orders: Vec<OrderResponse>,
}

impl OrderResponse {
    fn summary(order: OrderRecord) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            status: order.status.to_string(),
            total_amount: order.total_amount.to_string(),
            payment_status: order.payment_status,
            payment_method: order.payment_method,
            notes: order.notes,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
            shipping_address: order.shipping_address,
            items: None,
        }
    }

    fn with_items(order: OrderRecord, items: Vec<OrderItemView>) -> Self {
        OrderResponse {
            items: Some(items.into_iter().map(Into::into).collect()),
            ..Self::summary(order)
        }
    }
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(item: OrderItemView) -> Self {
        OrderItemResponse {
            order_item_id: item.id,
            model_id: item.model_id,
            name: item.name,
            preview_url: item.preview_url,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            line_total: item.line_total.to_string(),
        }
    }
}

impl From<TimelineStep> for TimelineStepResponse {
    fn from(step: TimelineStep) -> Self {
        TimelineStepResponse {
            status: step.status.to_string(),
            label: step.label.to_string(),
            timestamp: step.timestamp.map(|t| t.to_rfc3339()),
            details: step.details,
            completed: step.completed,
        }
    }
}

impl From<OrderOverview> for OrderEnvelope {
    fn from(overview: OrderOverview) -> Self {
        OrderEnvelope {
            success: true,
            order: OrderResponse::with_items(overview.details.order, overview.details.items),
            timeline: overview.timeline.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Converts the caller's cart into an order. The cart rows are locked, the
/// order, its items and the first history row are written, and the cart is
/// emptied inside one database transaction; on any failure nothing changes.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = CheckoutResponse),
        (status = 400, description = "Cart is empty or userId missing"),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Checking out for another user without admin role"),
        (status = 500, description = "Transaction failed and was rolled back"),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn checkout(
    service: web::Data<Orders>,
    caller: Caller,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let req = Checkout {
        user_id: body.user_id,
        shipping_address: body.shipping_address,
        payment_method: body.payment_method,
        notes: body.notes,
    };

    let placed = web::block(move || service.checkout(&caller, req)).await??;

    Ok(HttpResponse::Created().json(CheckoutResponse {
        success: true,
        order_id: placed.order_id,
        status: placed.status.to_string(),
    }))
}

/// GET /orders/{orderId}
///
/// Returns the order with its items and the five-step status timeline.
#[utoipa::path(
    get,
    path = "/orders/{orderId}",
    params(("orderId" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderEnvelope),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<Orders>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let overview = web::block(move || service.get_order(&caller, order_id)).await??;
    Ok(HttpResponse::Ok().json(OrderEnvelope::from(overview)))
}

/// GET /orders/user/{userId}
///
/// Lists a user's orders, newest first, without their items.
#[utoipa::path(
    get,
    path = "/orders/user/{userId}",
    params(("userId" = i32, Path, description = "Order owner")),
    responses(
        (status = 200, description = "Orders of the user", body = OrderListResponse),
        (status = 403, description = "Not the owner and not an admin"),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn get_orders_for_user(
    service: web::Data<Orders>,
    caller: Caller,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let (user_id, orders) =
        web::block(move || service.orders_for_user(&caller, Some(user_id))).await??;

    Ok(HttpResponse::Ok().json(OrderListResponse {
        success: true,
        user_id,
        orders: orders.into_iter().map(OrderResponse::summary).collect(),
    }))
}

/// PATCH /orders/{orderId}/status
///
/// Admin only. Records the next lifecycle status in the history and moves the
/// order's current status in the same transaction.
#[utoipa::path(
    patch,
    path = "/orders/{orderId}/status",
    params(("orderId" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status recorded", body = OrderEnvelope),
        (status = 400, description = "Unknown or already recorded status"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn update_order_status(
    service: web::Data<Orders>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();
    let overview = web::block(move || {
        service.advance_status(&caller, order_id, &body.status, body.details)
    })
    .await??;
    Ok(HttpResponse::Ok().json(OrderEnvelope::from(overview)))
}
