use serde_json::Value;
use uuid::Uuid;

use crate::domain::access::Caller;
use crate::domain::cart::clean_text;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    encode_shipping_address, CheckoutRequest, OrderDetails, OrderRecord, OrderStatus, PlacedOrder,
    StatusChange, MAX_PAYMENT_METHOD_LEN,
};
use crate::domain::ports::OrderRepository;
use crate::domain::timeline::{build_timeline, TimelineStep};

#[derive(Debug, Clone, Default)]
pub struct Checkout {
    pub user_id: Option<i32>,
    pub shipping_address: Option<Value>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// An order as shown to its owner: details plus the projected timeline.
#[derive(Debug, Clone)]
pub struct OrderOverview {
    pub details: OrderDetails,
    pub timeline: Vec<TimelineStep>,
}

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn checkout(&self, caller: &Caller, req: Checkout) -> Result<PlacedOrder, DomainError> {
        let user_id = caller.resolve_target_user(req.user_id)?;

        let placed = self.repo.checkout(CheckoutRequest {
            user_id,
            shipping_address: encode_shipping_address(req.shipping_address.as_ref()),
            payment_method: clean_text(req.payment_method.as_deref(), MAX_PAYMENT_METHOD_LEN),
            notes: clean_text(req.notes.as_deref(), usize::MAX),
        })?;
        log::info!("user {} placed order {}", user_id, placed.order_id);

        Ok(placed)
    }

    pub fn get_order(&self, caller: &Caller, order_id: Uuid) -> Result<OrderOverview, DomainError> {
        let details = self
            .repo
            .find_by_id(order_id)?
            .ok_or_else(|| DomainError::not_found("Order not found."))?;
        caller.ensure_can_view_order(details.order.user_id)?;

        let timeline = build_timeline(details.order.status, &details.history);
        Ok(OrderOverview { details, timeline })
    }

    /// Orders of one user, newest first, without their items.
    pub fn orders_for_user(
        &self,
        caller: &Caller,
        user_id: Option<i32>,
    ) -> Result<(i32, Vec<OrderRecord>), DomainError> {
        let user_id = caller.resolve_target_user(user_id)?;
        let orders = self.repo.list_for_user(user_id)?;
        Ok((user_id, orders))
    }

    pub fn advance_status(
        &self,
        caller: &Caller,
        order_id: Uuid,
        status: &str,
        details: Option<String>,
    ) -> Result<OrderOverview, DomainError> {
        caller.ensure_admin()?;
        let status: OrderStatus = status.parse()?;

        self.repo.append_status(StatusChange {
            order_id,
            status,
            details: clean_text(details.as_deref(), usize::MAX),
        })?;
        log::info!("order {} moved to {}", order_id, status);

        self.get_order(caller, order_id)
    }
}
