use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
};

pub const PREFIX: &str = "WK";
const MAX_ATTEMPTS: usize = 8;

/// `WK` + `YYYYMMDD` + four uppercase hex characters.
pub fn build_order_number(now: DateTime<Utc>, entropy: Uuid) -> String {
    let suffix: String = entropy
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect::<String>()
        .to_uppercase();
    format!("{PREFIX}{}{suffix}", now.format("%Y%m%d"))
}

/// Pick an order number not used by any existing order. Runs inside the
/// creating transaction; the unique index on `order_number` still guards
/// against a concurrent insert of the same value.
pub async fn next_order_number<C: ConnectionTrait>(db: &C) -> AppResult<String> {
    next_order_number_with(db, || build_order_number(Utc::now(), Uuid::new_v4())).await
}

/// Same as [`next_order_number`] with the candidate source supplied by the caller.
pub async fn next_order_number_with<C, F>(db: &C, mut candidates: F) -> AppResult<String>
where
    C: ConnectionTrait,
    F: FnMut() -> String,
{
    for _ in 0..MAX_ATTEMPTS {
        let candidate = candidates();
        let taken = Orders::find()
            .filter(OrderCol::OrderNumber.eq(candidate.as_str()))
            .count(db)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
        tracing::debug!(order_number = %candidate, "order number collision, retrying");
    }
    Err(AppError::Conflict(
        "Could not allocate an order number, please retry".into(),
    ))
}
