use serde_json::Value;

use crate::domain::access::Caller;
use crate::domain::cart::{
    clean_text, quantity_limit_error, CartLineInput, CartView, MAX_CART_NOTES_LEN,
    MAX_LINE_QUANTITY,
};
use crate::domain::errors::DomainError;
use crate::domain::money::{normalize_price, price_from_json, zero};
use crate::domain::ports::CartRepository;

#[derive(Debug, Clone, Default)]
pub struct AddToCart {
    pub user_id: Option<i32>,
    pub model_id: Option<i32>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Value>,
    pub notes: Option<String>,
}

pub struct CartService<R> {
    repo: R,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_item(&self, caller: &Caller, req: AddToCart) -> Result<CartView, DomainError> {
        let user_id = caller.resolve_target_user(req.user_id)?;
        let model_id = req
            .model_id
            .filter(|id| *id > 0)
            .ok_or_else(|| DomainError::validation("A valid modelId is required."))?;
        let quantity = match req.quantity {
            None => 1,
            Some(q) if q > MAX_LINE_QUANTITY => return Err(quantity_limit_error()),
            Some(q) if q > 0 => q,
            Some(_) => return Err(DomainError::validation("Quantity must be a positive integer.")),
        };

        let model = self
            .repo
            .find_model(model_id)?
            .ok_or_else(|| DomainError::not_found("Model not found."))?;

        let unit_price = match req.unit_price.as_ref().filter(|v| !v.is_null()) {
            Some(explicit) => price_from_json(explicit),
            None => model
                .estimated_price
                .as_ref()
                .map(normalize_price)
                .unwrap_or_else(zero),
        };

        self.repo.upsert_line(CartLineInput {
            user_id,
            model_id: model.id,
            quantity,
            unit_price,
            notes: clean_text(req.notes.as_deref(), MAX_CART_NOTES_LEN),
        })?;
        log::debug!("user {} added model {} x{} to cart", user_id, model_id, quantity);

        self.get_cart(user_id)
    }

    pub fn view_cart(&self, caller: &Caller, user_id: Option<i32>) -> Result<CartView, DomainError> {
        let user_id = caller.resolve_target_user(user_id)?;
        self.get_cart(user_id)
    }

    /// A quantity of zero or below removes the line.
    pub fn update_quantity(
        &self,
        caller: &Caller,
        user_id: Option<i32>,
        cart_item_id: Option<i32>,
        quantity: Option<i32>,
    ) -> Result<CartView, DomainError> {
        let user_id = caller.resolve_target_user(user_id)?;
        let cart_item_id = valid_cart_item_id(cart_item_id)?;
        let quantity =
            quantity.ok_or_else(|| DomainError::validation("A valid quantity is required."))?;
        if quantity > MAX_LINE_QUANTITY {
            return Err(quantity_limit_error());
        }

        let matched = if quantity <= 0 {
            self.repo.remove_line(user_id, cart_item_id)?
        } else {
            self.repo.set_quantity(user_id, cart_item_id, quantity)?
        };
        if !matched {
            return Err(DomainError::not_found("Cart item not found."));
        }

        self.get_cart(user_id)
    }

    pub fn remove_item(
        &self,
        caller: &Caller,
        user_id: Option<i32>,
        cart_item_id: Option<i32>,
    ) -> Result<CartView, DomainError> {
        let user_id = caller.resolve_target_user(user_id)?;
        let cart_item_id = valid_cart_item_id(cart_item_id)?;

        if !self.repo.remove_line(user_id, cart_item_id)? {
            return Err(DomainError::not_found("Cart item not found."));
        }

        self.get_cart(user_id)
    }

    pub fn clear(&self, caller: &Caller, user_id: Option<i32>) -> Result<usize, DomainError> {
        let user_id = caller.resolve_target_user(user_id)?;
        let removed = self.repo.clear(user_id)?;
        log::debug!("cleared {} cart lines for user {}", removed, user_id);
        Ok(removed)
    }

    fn get_cart(&self, user_id: i32) -> Result<CartView, DomainError> {
        let lines = self.repo.load_lines(user_id)?;
        Ok(CartView::from_records(user_id, lines))
    }
}

fn valid_cart_item_id(id: Option<i32>) -> Result<i32, DomainError> {
    id.filter(|id| *id > 0)
        .ok_or_else(|| DomainError::validation("A valid cartItemId is required."))
}
