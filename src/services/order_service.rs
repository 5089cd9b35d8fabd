use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, DbErr,
    EntityTrait, Iterable, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{
        CreateOrderRequest, OrderList, OrderStats, OrderWithItems, StatusCount, UpdateOrderRequest,
    },
    entity::{
        menu_items::Entity as MenuItems,
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
            OrderStatus, PaymentMethod, PaymentStatus,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{Order, OrderItem},
    response::{ApiResponse, Pagination},
    routes::params::OrderListQuery,
    services::{
        order_number::next_order_number,
        pricing::{OrderTotals, PricedLine, compute_totals},
        settings_service,
        validation::{NAME_MAX, PHONE_MAX, check_len},
    },
    state::AppState,
};

/// Customer snapshot stored on the order row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub notes: String,
}

/// A create-order request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
    pub payment_method: PaymentMethod,
}

impl NewOrder {
    pub fn priced_lines(&self) -> Vec<PricedLine> {
        self.lines
            .iter()
            .map(|line| PricedLine {
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check a create-order request without touching the database.
pub fn validate_order(payload: CreateOrderRequest) -> AppResult<NewOrder> {
    let (customer, items) = match (payload.customer, payload.items) {
        (Some(customer), Some(items)) if !items.is_empty() => (customer, items),
        _ => {
            return Err(AppError::BadRequest(
                "Customer data and items are required".into(),
            ));
        }
    };

    let (Some(name), Some(phone), Some(address)) = (
        non_blank(customer.name),
        non_blank(customer.phone),
        non_blank(customer.address),
    ) else {
        return Err(AppError::BadRequest(
            "Customer name, phone, and address are required".into(),
        ));
    };
    check_len("customer_name", &name, NAME_MAX)?;
    check_len("customer_phone", &phone, PHONE_MAX)?;

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        match (item.id, item.quantity, item.price) {
            (Some(menu_item_id), Some(quantity), Some(unit_price))
                if quantity > 0 && unit_price >= 0 =>
            {
                lines.push(OrderLine {
                    menu_item_id,
                    quantity,
                    unit_price,
                    notes: item.notes.unwrap_or_default().trim().to_string(),
                });
            }
            _ => return Err(AppError::BadRequest("Invalid item data".into())),
        }
    }

    Ok(NewOrder {
        customer: Customer {
            name,
            phone,
            address,
            notes: customer.notes.unwrap_or_default().trim().to_string(),
        },
        lines,
        payment_method: payload.payment_method.unwrap_or_default(),
    })
}

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let new_order = validate_order(payload)?;

    let fees = settings_service::delivery_fees(&state.orm).await?;
    let totals = compute_totals(&new_order.priced_lines(), fees)?;

    let txn = state.orm.begin().await?;
    let (order, items) = match insert_order(&txn, &new_order, totals).await {
        Ok(created) => created,
        Err(err) => {
            match txn.rollback().await {
                Ok(()) => tracing::warn!(error = %err, "order creation rolled back"),
                Err(rollback_err) => tracing::error!(
                    error = %err,
                    rollback_error = %rollback_err,
                    "order creation failed and rollback failed"
                ),
            }
            return Err(err);
        }
    };
    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        total = order.total_amount,
        items = items.len(),
        "order created"
    );
    audit::record(
        &state.orm,
        None,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": order.id, "order_number": order.order_number }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order created successfully",
        with_items(order, items),
        None,
    ))
}

/// Insert the order row and its lines. The caller owns the transaction.
async fn insert_order(
    txn: &DatabaseTransaction,
    new_order: &NewOrder,
    totals: OrderTotals,
) -> AppResult<(OrderModel, Vec<OrderItemModel>)> {
    let now = Utc::now();
    let order_number = next_order_number(txn).await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: Set(order_number),
        customer_name: Set(new_order.customer.name.clone()),
        customer_phone: Set(new_order.customer.phone.clone()),
        customer_address: Set(new_order.customer.address.clone()),
        customer_notes: Set(new_order.customer.notes.clone()),
        subtotal: Set(totals.subtotal),
        delivery_fee: Set(totals.delivery_fee),
        total_amount: Set(totals.total),
        status: Set(OrderStatus::Pending),
        payment_status: Set(PaymentStatus::Unpaid),
        payment_method: Set(new_order.payment_method),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(txn)
    .await
    .map_err(conflict_on_duplicate)?;

    let mut items = Vec::with_capacity(new_order.lines.len());
    for (position, line) in new_order.lines.iter().enumerate() {
        let menu_item = MenuItems::find_by_id(line.menu_item_id)
            .one(txn)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Menu item {} not found", line.menu_item_id))
            })?;
        if !menu_item.is_available {
            return Err(AppError::BadRequest(format!(
                "Menu item {} is not available",
                menu_item.name
            )));
        }

        let priced = PricedLine {
            quantity: line.quantity,
            unit_price: line.unit_price,
        };
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(menu_item.id),
            position: Set(position as i32),
            item_name: Set(menu_item.name),
            quantity: Set(line.quantity),
            price: Set(line.unit_price),
            subtotal: Set(priced.subtotal()?),
            notes: Set(line.notes.clone()),
        }
        .insert(txn)
        .await?;
        items.push(item);
    }

    Ok((order, items))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_staff(user)?;
    let (limit, offset) = query.page().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::OrderNumber);

    let total = finder.clone().count(&state.orm).await?;
    let orders = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut items_by_order = load_items_for(&state.orm, ids).await?;

    let items = orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            Order::from_entity(order, &items)
        })
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Pagination::new(total, limit, offset)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_staff(user)?;
    let order = find_order(&state.orm, id).await?;
    let items = load_items(&state.orm, order.id).await?;
    Ok(ApiResponse::success("OK", with_items(order, items), None))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_staff(user)?;
    let existing = find_order(&state.orm, id).await?;

    if payload.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let previous_status = existing.status;
    if let Some(next) = payload.status {
        if !previous_status.can_transition_to(next) {
            return Err(AppError::BadRequest(format!(
                "Cannot change order status from {} to {}",
                previous_status.as_str(),
                next.as_str()
            )));
        }
    }

    let mut active: OrderActive = existing.into();
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(payment_status) = payload.payment_status {
        active.payment_status = Set(payment_status);
    }
    if let Some(payment_method) = payload.payment_method {
        active.payment_method = Set(payment_method);
    }
    if let Some(name) = payload.customer_name {
        let name = required_field("customer_name", name)?;
        check_len("customer_name", &name, NAME_MAX)?;
        active.customer_name = Set(name);
    }
    if let Some(phone) = payload.customer_phone {
        let phone = required_field("customer_phone", phone)?;
        check_len("customer_phone", &phone, PHONE_MAX)?;
        active.customer_phone = Set(phone);
    }
    if let Some(address) = payload.customer_address {
        active.customer_address = Set(required_field("customer_address", address)?);
    }
    if let Some(notes) = payload.customer_notes {
        active.customer_notes = Set(notes.trim().to_string());
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    if order.status != previous_status {
        tracing::info!(
            order_number = %order.order_number,
            from = previous_status.as_str(),
            to = order.status.as_str(),
            "order status changed"
        );
    }
    audit::record(
        &state.orm,
        Some(user.user_id),
        "order_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    let items = load_items(&state.orm, order.id).await?;
    Ok(ApiResponse::success(
        "Order updated successfully",
        with_items(order, items),
        None,
    ))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;

    let txn = state.orm.begin().await?;
    let order = find_order(&txn, id).await?;
    OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .exec(&txn)
        .await?;
    Orders::delete_by_id(order.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(order_number = %order.order_number, "order deleted");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "order_delete",
        "orders",
        serde_json::json!({ "order_id": order.id, "order_number": order.order_number }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order deleted successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn order_stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderStats>> {
    ensure_staff(user)?;

    let mut by_status = Vec::new();
    let mut total_orders = 0;
    for status in OrderStatus::iter() {
        let count = Orders::find()
            .filter(OrderCol::Status.eq(status))
            .count(&state.orm)
            .await?;
        total_orders += count;
        by_status.push(StatusCount { status, count });
    }

    let delivered_revenue = Orders::find()
        .select_only()
        .column_as(
            Expr::cust("CAST(COALESCE(SUM(total_amount), 0) AS BIGINT)"),
            "revenue",
        )
        .filter(OrderCol::Status.eq(OrderStatus::Delivered))
        .into_tuple::<i64>()
        .one(&state.orm)
        .await?
        .unwrap_or(0);

    Ok(ApiResponse::success(
        "Order stats",
        OrderStats {
            total_orders,
            by_status,
            delivered_revenue,
        },
        None,
    ))
}

async fn find_order<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<OrderModel> {
    Orders::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))
}

async fn load_items<C: ConnectionTrait>(db: &C, order_id: Uuid) -> AppResult<Vec<OrderItemModel>> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::Position)
        .all(db)
        .await?;
    Ok(items)
}

async fn load_items_for<C: ConnectionTrait>(
    db: &C,
    order_ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, Vec<OrderItemModel>>> {
    let mut grouped: HashMap<Uuid, Vec<OrderItemModel>> = HashMap::new();
    if order_ids.is_empty() {
        return Ok(grouped);
    }
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::Position)
        .all(db)
        .await?;
    for item in items {
        grouped.entry(item.order_id).or_default().push(item);
    }
    Ok(grouped)
}

fn with_items(order: OrderModel, items: Vec<OrderItemModel>) -> OrderWithItems {
    OrderWithItems {
        order: Order::from_entity(order, &items),
        items: items.into_iter().map(OrderItem::from).collect(),
    }
}

/// A unique-index hit on the order row means another request took the same
/// order number between the check and the insert.
pub fn conflict_on_duplicate(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!(detail = %detail, "order number collided on insert");
            AppError::Conflict("Order number already taken, please retry".into())
        }
        _ => AppError::OrmError(err),
    }
}

fn required_field(field: &str, value: String) -> AppResult<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(value)
}
