use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::application::cart_service::{AddToCart, CartService};
use crate::domain::access::Caller;
use crate::domain::cart::{CartLineView, CartView};
use crate::errors::AppError;
use crate::infrastructure::cart_repo::DieselCartRepository;

pub type Carts = CartService<DieselCartRepository>;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    /// Defaults to the caller. Only admins may name another user.
    pub user_id: Option<i32>,
    pub model_id: Option<i32>,
    /// Defaults to 1.
    pub quantity: Option<i32>,
    pub notes: Option<String>,
    /// Overrides the catalog price. Numbers or numeric strings; anything
    /// else is stored as 0.00.
    #[schema(value_type = Option<Object>)]
    pub unit_price: Option<Value>,
}

impl From<AddToCartRequest> for AddToCart {
    fn from(req: AddToCartRequest) -> Self {
        AddToCart {
            user_id: req.user_id,
            model_id: req.model_id,
            quantity: req.quantity,
            unit_price: req.unit_price,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub cart_item_id: Option<i32>,
    pub user_id: Option<i32>,
    /// Zero or below removes the line.
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RemoveCartItemQuery {
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub cart_item_id: i32,
    pub model_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub preview_url: Option<String>,
    /// Current catalog price, for comparison with the locked-in unit price.
    pub catalog_price: Option<String>,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartTotalsResponse {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub user_id: i32,
    pub items: Vec<CartItemResponse>,
    pub totals: CartTotalsResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub cart: CartResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl From<CartLineView> for CartItemResponse {
    fn from(line: CartLineView) -> Self {
        CartItemResponse {
            cart_item_id: line.cart_item_id,
            model_id: line.model_id,
            name: line.name,
            description: line.description,
            preview_url: line.preview_url,
            catalog_price: line.catalog_price.map(|p| p.to_string()),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            line_total: line.line_total.to_string(),
            notes: line.notes,
        }
    }
}

impl From<CartView> for CartResponse {
    fn from(cart: CartView) -> Self {
        CartResponse {
            user_id: cart.user_id,
            items: cart.items.into_iter().map(Into::into).collect(),
            totals: CartTotalsResponse {
                item_count: cart.totals.item_count,
                total_quantity: cart.totals.total_quantity,
                subtotal: cart.totals.subtotal.to_string(),
            },
        }
    }
}

fn cart_ok(cart: CartView, message: Option<&str>) -> HttpResponse {
    HttpResponse::Ok().json(CartEnvelope {
        success: true,
        message: message.map(str::to_string),
        cart: cart.into(),
    })
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /cart/add
///
/// Adds a model to the cart, or increases the quantity of an existing line
/// for the same model.
#[utoipa::path(
    post,
    path = "/cart/add",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added", body = CartEnvelope),
        (status = 400, description = "Invalid modelId or quantity"),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Acting for another user without admin role"),
        (status = 404, description = "Model not found"),
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn add_to_cart(
    service: web::Data<Carts>,
    caller: Caller,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let req = AddToCart::from(body.into_inner());
    let cart = web::block(move || service.add_item(&caller, req)).await??;
    Ok(cart_ok(cart, Some("Item added to cart.")))
}

/// GET /cart/{userId}
#[utoipa::path(
    get,
    path = "/cart/{userId}",
    params(("userId" = i32, Path, description = "Cart owner")),
    responses(
        (status = 200, description = "Current cart", body = CartEnvelope),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Not the owner and not an admin"),
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn get_cart(
    service: web::Data<Carts>,
    caller: Caller,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let cart = web::block(move || service.view_cart(&caller, Some(user_id))).await??;
    Ok(cart_ok(cart, None))
}

/// PATCH /cart/update
#[utoipa::path(
    patch,
    path = "/cart/update",
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Cart updated", body = CartEnvelope),
        (status = 400, description = "Invalid cartItemId or quantity"),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn update_cart_item(
    service: web::Data<Carts>,
    caller: Caller,
    body: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let cart = web::block(move || {
        service.update_quantity(&caller, body.user_id, body.cart_item_id, body.quantity)
    })
    .await??;
    Ok(cart_ok(cart, Some("Cart updated successfully.")))
}

/// DELETE /cart/remove/{cartItemId}
#[utoipa::path(
    delete,
    path = "/cart/remove/{cartItemId}",
    params(
        ("cartItemId" = i32, Path, description = "Cart line to remove"),
        RemoveCartItemQuery,
    ),
    responses(
        (status = 200, description = "Item removed", body = CartEnvelope),
        (status = 404, description = "Cart item not found"),
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn remove_cart_item(
    service: web::Data<Carts>,
    caller: Caller,
    path: web::Path<i32>,
    query: web::Query<RemoveCartItemQuery>,
) -> Result<HttpResponse, AppError> {
    let cart_item_id = path.into_inner();
    let user_id = query.into_inner().user_id;
    let cart =
        web::block(move || service.remove_item(&caller, user_id, Some(cart_item_id))).await??;
    Ok(cart_ok(cart, Some("Item removed from cart.")))
}

/// DELETE /cart/clear/{userId}
#[utoipa::path(
    delete,
    path = "/cart/clear/{userId}",
    params(("userId" = i32, Path, description = "Cart owner")),
    responses(
        (status = 200, description = "Cart emptied", body = MessageResponse),
        (status = 403, description = "Not the owner and not an admin"),
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn clear_cart(
    service: web::Data<Carts>,
    caller: Caller,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    web::block(move || service.clear(&caller, Some(user_id))).await??;
    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: "Cart cleared successfully.".to_string(),
    }))
}
