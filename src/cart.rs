//! In-memory cart used by storefront clients to build an order.
//!
//! Lines are keyed by menu item; adding the same item again bumps its
//! quantity. [`Cart::checkout`] turns the cart into the request body accepted
//! by `POST /api/orders`.

use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, CustomerInput, OrderItemInput},
    entity::orders::PaymentMethod,
    error::{AppError, AppResult},
    models::MenuItem,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub menu_item_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub notes: Option<String>,
}

impl CartLine {
    pub fn subtotal(&self) -> i64 {
        self.unit_price.saturating_mul(self.quantity as i64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of a menu item at its current price. Non-positive
    /// quantities are ignored.
    pub fn add(&mut self, item: &MenuItem, quantity: i32) {
        if quantity <= 0 {
            return;
        }
        match self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                menu_item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity,
                notes: None,
            }),
        }
    }

    /// Apply a +/- delta; the line disappears when its quantity reaches 0.
    pub fn change_quantity(&mut self, menu_item_id: Uuid, delta: i32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_item_id == menu_item_id) {
            line.quantity = line.quantity.saturating_add(delta);
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    pub fn set_notes(&mut self, menu_item_id: Uuid, notes: impl Into<String>) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_item_id == menu_item_id) {
            line.notes = Some(notes.into());
        }
    }

    pub fn remove(&mut self, menu_item_id: Uuid) {
        self.lines.retain(|l| l.menu_item_id != menu_item_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity as i64).sum()
    }

    /// Sum of line subtotals, before any delivery fee.
    pub fn subtotal(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, l| acc.saturating_add(l.subtotal()))
    }

    pub fn checkout(
        &self,
        customer: CustomerInput,
        payment_method: PaymentMethod,
    ) -> AppResult<CreateOrderRequest> {
        if self.is_empty() {
            return Err(AppError::BadRequest("Cart is empty".into()));
        }
        let items = self
            .lines
            .iter()
            .map(|line| OrderItemInput {
                id: Some(line.menu_item_id),
                quantity: Some(line.quantity),
                price: Some(line.unit_price),
                notes: line.notes.clone(),
            })
            .collect();
        Ok(CreateOrderRequest {
            customer: Some(customer),
            items: Some(items),
            payment_method: Some(payment_method),
        })
    }
}
