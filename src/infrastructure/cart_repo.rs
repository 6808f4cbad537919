use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;

use crate::db::DbPool;
use crate::domain::cart::{quantity_limit_error, CartLineInput, CartLineRecord, CatalogModel};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_items, furniture_models};

use super::models::{cart_line_record, CartItemRow, FurnitureModelRow, NewCartItemRow};

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn find_model(&self, model_id: i32) -> Result<Option<CatalogModel>, DomainError> {
        let mut conn = self.pool.get()?;

        let model = furniture_models::table
            .filter(furniture_models::id.eq(model_id))
            .select(FurnitureModelRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(model.map(CatalogModel::from))
    }

    fn upsert_line(&self, line: CartLineInput) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // ON CONFLICT keeps one row per (user, model); quantities accumulate
        // while price and notes follow the latest add.
        diesel::insert_into(cart_items::table)
            .values(&NewCartItemRow {
                user_id: line.user_id,
                model_id: line.model_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                notes: line.notes,
            })
            .on_conflict((cart_items::user_id, cart_items::model_id))
            .do_update()
            .set((
                cart_items::quantity.eq(cart_items::quantity + excluded(cart_items::quantity)),
                cart_items::unit_price.eq(excluded(cart_items::unit_price)),
                cart_items::notes.eq(excluded(cart_items::notes)),
                cart_items::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .map_err(quantity_error)?;

        Ok(())
    }

    fn set_quantity(&self, user_id: i32, cart_item_id: i32, quantity: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(
            cart_items::table
                .filter(cart_items::id.eq(cart_item_id))
                .filter(cart_items::user_id.eq(user_id)),
        )
        .set((
            cart_items::quantity.eq(quantity),
            cart_items::updated_at.eq(Utc::now()),
        ))
        .execute(&mut conn)
        .map_err(quantity_error)?;

        Ok(updated > 0)
    }

    fn remove_line(&self, user_id: i32, cart_item_id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(
            cart_items::table
                .filter(cart_items::id.eq(cart_item_id))
                .filter(cart_items::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    fn clear(&self, user_id: i32) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(cart_items::table.filter(cart_items::user_id.eq(user_id)))
            .execute(&mut conn)?;

        Ok(deleted)
    }

    fn load_lines(&self, user_id: i32) -> Result<Vec<CartLineRecord>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = cart_items::table
            .inner_join(furniture_models::table)
            .filter(cart_items::user_id.eq(user_id))
            .order((cart_items::updated_at.desc(), cart_items::id.desc()))
            .select((CartItemRow::as_select(), FurnitureModelRow::as_select()))
            .load::<(CartItemRow, FurnitureModelRow)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(item, model)| cart_line_record(item, model))
            .collect())
    }
}

/// Maps a breach of the per-line quantity constraint to a validation error.
fn quantity_error(e: DieselError) -> DomainError {
    let over_limit = matches!(
        &e,
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info)
            if info.constraint_name() == Some("cart_items_quantity_range")
    );
    if over_limit {
        quantity_limit_error()
    } else {
        e.into()
    }
}
