//! Customer cart

use shared::error::{AppError, ErrorCode};
use shared::models::CartLine;

use crate::db::Store;
use crate::error::ServiceResult;

/// Set the quantity for one food; `quantity <= 0` removes the line
pub async fn upsert_line(
    store: &dyn Store,
    customer_id: i64,
    line: CartLine,
) -> ServiceResult<Vec<CartLine>> {
    if line.quantity > 0 && store.find_foods(&[line.food_id]).await?.is_empty() {
        return Err(AppError::new(ErrorCode::FoodNotFound)
            .with_detail("food_id", line.food_id)
            .into());
    }
    Ok(store.upsert_cart_line(customer_id, line).await?)
}

pub async fn read(store: &dyn Store, customer_id: i64) -> ServiceResult<Vec<CartLine>> {
    Ok(store.cart(customer_id).await?)
}

pub async fn clear(store: &dyn Store, customer_id: i64) -> ServiceResult<()> {
    store.clear_cart(customer_id).await?;
    tracing::debug!(customer_id, "Cart cleared");
    Ok(())
}
