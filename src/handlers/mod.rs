pub mod cart;
pub mod health;
pub mod orders;

use actix_web::{error, web, HttpRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::errors::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        cart::add_to_cart,
        cart::get_cart,
        cart::update_cart_item,
        cart::remove_cart_item,
        cart::clear_cart,
        orders::checkout,
        orders::get_order,
        orders::get_orders_for_user,
        orders::update_order_status,
        health::health,
    ),
    components(schemas(
        cart::AddToCartRequest,
        cart::UpdateCartItemRequest,
        cart::CartEnvelope,
        cart::CartResponse,
        cart::CartItemResponse,
        cart::CartTotalsResponse,
        cart::MessageResponse,
        orders::CheckoutRequest,
        orders::CheckoutResponse,
        orders::UpdateStatusRequest,
        orders::OrderEnvelope,
        orders::OrderResponse,
        orders::OrderItemResponse,
        orders::TimelineStepResponse,
        orders::OrderListResponse,
        health::HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "cart", description = "Per-user shopping cart"),
        (name = "orders", description = "Checkout and order lifecycle"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// Malformed bodies, paths and queries get the same JSON error shape as
// domain validation failures.

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _: &HttpRequest| {
        AppError::BadRequest(format!("Invalid request body: {err}")).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: error::PathError, _: &HttpRequest| {
        AppError::BadRequest(format!("Invalid path parameter: {err}")).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _: &HttpRequest| {
        AppError::BadRequest(format!("Invalid query string: {err}")).into()
    })
}
