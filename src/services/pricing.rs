//! Order total computation.
//!
//! The storefront charges a flat delivery fee on orders whose item subtotal is
//! below the configured minimum. Both values come from the `settings` table.

use crate::error::{AppError, AppResult};

pub const DELIVERY_FEE_KEY: &str = "delivery_fee";
pub const MINIMUM_ORDER_KEY: &str = "minimum_order";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryFees {
    pub delivery_fee: i64,
    pub minimum_order: i64,
}

impl DeliveryFees {
    /// Build from raw setting values. Missing or unparsable values count as 0.
    pub fn from_settings(delivery_fee: Option<&str>, minimum_order: Option<&str>) -> Self {
        Self {
            delivery_fee: parse_amount(DELIVERY_FEE_KEY, delivery_fee),
            minimum_order: parse_amount(MINIMUM_ORDER_KEY, minimum_order),
        }
    }
}

fn parse_amount(key: &str, raw: Option<&str>) -> i64 {
    let Some(raw) = raw else { return 0 };
    match raw.trim().parse::<i64>() {
        Ok(v) if v >= 0 => v,
        _ => {
            tracing::warn!(key, value = raw, "ignoring invalid amount setting");
            0
        }
    }
}

/// Quantity and unit price of one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub quantity: i32,
    pub unit_price: i64,
}

impl PricedLine {
    pub fn subtotal(&self) -> AppResult<i64> {
        self.unit_price
            .checked_mul(self.quantity as i64)
            .ok_or_else(out_of_range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub total: i64,
}

pub fn compute_totals(lines: &[PricedLine], fees: DeliveryFees) -> AppResult<OrderTotals> {
    let mut subtotal: i64 = 0;
    for line in lines {
        subtotal = subtotal
            .checked_add(line.subtotal()?)
            .ok_or_else(out_of_range)?;
    }

    let delivery_fee = if subtotal < fees.minimum_order {
        fees.delivery_fee
    } else {
        0
    };
    let total = subtotal.checked_add(delivery_fee).ok_or_else(out_of_range)?;

    Ok(OrderTotals {
        subtotal,
        delivery_fee,
        total,
    })
}

fn out_of_range() -> AppError {
    AppError::BadRequest("Order total is out of range".into())
}
