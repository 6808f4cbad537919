use uuid::Uuid;

use super::cart::{CartLineInput, CartLineRecord, CatalogModel};
use super::errors::DomainError;
use super::order::{CheckoutRequest, OrderDetails, OrderRecord, PlacedOrder, StatusChange};

pub trait CartRepository: Send + Sync + 'static {
    fn find_model(&self, model_id: i32) -> Result<Option<CatalogModel>, DomainError>;
    /// Inserts the line, or adds to the quantity of an existing (user, model) line.
    fn upsert_line(&self, line: CartLineInput) -> Result<(), DomainError>;
    /// Returns `false` when no row of `user_id` has that id.
    fn set_quantity(&self, user_id: i32, cart_item_id: i32, quantity: i32) -> Result<bool, DomainError>;
    fn remove_line(&self, user_id: i32, cart_item_id: i32) -> Result<bool, DomainError>;
    fn clear(&self, user_id: i32) -> Result<usize, DomainError>;
    fn load_lines(&self, user_id: i32) -> Result<Vec<CartLineRecord>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Converts the user's cart into an order in a single transaction.
    fn checkout(&self, request: CheckoutRequest) -> Result<PlacedOrder, DomainError>;
    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderDetails>, DomainError>;
    fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderRecord>, DomainError>;
    /// Appends a history row and moves `orders.status` in the same transaction.
    fn append_status(&self, change: StatusChange) -> Result<(), DomainError>;
}
