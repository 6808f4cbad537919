use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    price_cart, CartSnapshotLine, CheckoutRequest, OrderDetails, OrderItemView, OrderRecord,
    OrderStatus, PlacedOrder, StatusChange, ORDER_CREATED_DETAILS, PAYMENT_PENDING,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{cart_items, furniture_models, order_items, order_status_history, orders};

use super::models::{
    CartItemRow, NewOrderItemRow, NewOrderRow, NewStatusHistoryRow, OrderItemRow, OrderRow,
    StatusHistoryRow,
};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn checkout(&self, request: CheckoutRequest) -> Result<PlacedOrder, DomainError> {
        let mut conn = self.pool.get()?;
        let user_id = request.user_id;

        let placed = conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Lock the cart. A concurrent checkout for the same user blocks
            //    here and sees an empty cart once this transaction commits.
            let cart: Vec<CartItemRow> = cart_items::table
                .filter(cart_items::user_id.eq(user_id))
                .order(cart_items::id.asc())
                .select(CartItemRow::as_select())
                .for_update()
                .load(conn)?;

            let locked_ids: Vec<i32> = cart.iter().map(|row| row.id).collect();
            let snapshot: Vec<CartSnapshotLine> = cart
                .into_iter()
                .map(|row| CartSnapshotLine {
                    model_id: row.model_id,
                    quantity: row.quantity,
                    unit_price: row.unit_price,
                })
                .collect();
            let priced = price_cart(&snapshot)?;

            // 2. Insert the order with its frozen total
            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id,
                    status: OrderStatus::OrderPlaced.as_str().to_string(),
                    total_amount: priced.total_amount,
                    shipping_address: request.shipping_address,
                    payment_method: request.payment_method,
                    payment_status: PAYMENT_PENDING.to_string(),
                    notes: request.notes,
                })
                .execute(conn)?;

            // 3. One order item per cart line
            let new_items: Vec<NewOrderItemRow> = priced
                .lines
                .into_iter()
                .zip(1..)
                .map(|(l, position)| NewOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id,
                    model_id: l.model_id,
                    position,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                    line_total: l.line_total,
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            // 4. First history row
            diesel::insert_into(order_status_history::table)
                .values(&NewStatusHistoryRow {
                    id: Uuid::new_v4(),
                    order_id,
                    status: OrderStatus::OrderPlaced.as_str().to_string(),
                    details: Some(ORDER_CREATED_DETAILS.to_string()),
                })
                .execute(conn)?;

            // 5. Remove exactly the lines that were ordered. A line added by a
            //    concurrent request after the locked read stays in the cart.
            diesel::delete(cart_items::table.filter(cart_items::id.eq_any(locked_ids)))
                .execute(conn)?;

            Ok(PlacedOrder {
                order_id,
                status: OrderStatus::OrderPlaced,
            })
        });

        if let Err(e) = &placed {
            log::warn!("checkout for user {} rolled back: {}", user_id, e);
        }
        placed
    }

    fn find_by_id(&self, order_id: Uuid) -> Result<Option<OrderDetails>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        // Catalog columns are for display only; prices come from the item rows.
        let items = order_items::table
            .inner_join(furniture_models::table)
            .filter(order_items::order_id.eq(order.id))
            .order(order_items::position.asc())
            .select((
                OrderItemRow::as_select(),
                furniture_models::name,
                furniture_models::preview_url,
                furniture_models::thumbnail_url,
            ))
            .load::<(OrderItemRow, String, Option<String>, Option<String>)>(&mut conn)?;

        let history = order_status_history::table
            .filter(order_status_history::order_id.eq(order.id))
            .order(order_status_history::created_at.asc())
            .select(StatusHistoryRow::as_select())
            .load(&mut conn)?;

        Ok(Some(OrderDetails {
            order: OrderRecord::try_from(order)?,
            items: items
                .into_iter()
                .map(|(item, name, preview_url, thumbnail_url)| OrderItemView {
                    id: item.id,
                    model_id: item.model_id,
                    name,
                    preview_url: preview_url.or(thumbnail_url),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total,
                })
                .collect(),
            history: history.into_iter().map(Into::into).collect(),
        }))
    }

    fn list_for_user(&self, user_id: i32) -> Result<Vec<OrderRecord>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .order(orders::created_at.desc())
            .select(OrderRow::as_select())
            .load(&mut conn)?;

        rows.into_iter().map(OrderRecord::try_from).collect()
    }

    fn append_status(&self, change: StatusChange) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order = orders::table
                .filter(orders::id.eq(change.order_id))
                .select(OrderRow::as_select())
                .for_update()
                .first(conn)
                .optional()?;
            if order.is_none() {
                return Err(DomainError::not_found("Order not found."));
            }

            let already_recorded: i64 = order_status_history::table
                .filter(order_status_history::order_id.eq(change.order_id))
                .filter(order_status_history::status.eq(change.status.as_str()))
                .count()
                .get_result(conn)?;
            if already_recorded > 0 {
                return Err(DomainError::validation(format!(
                    "Order already has status '{}'.",
                    change.status
                )));
            }

            diesel::insert_into(order_status_history::table)
                .values(&NewStatusHistoryRow {
                    id: Uuid::new_v4(),
                    order_id: change.order_id,
                    status: change.status.as_str().to_string(),
                    details: change.details,
                })
                .execute(conn)?;

            diesel::update(orders::table.filter(orders::id.eq(change.order_id)))
                .set((
                    orders::status.eq(change.status.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            Ok(())
        })
    }
}
