mod common;

use common::{
    configure_delivery, count, create_category, create_menu_item, create_user, line,
    order_request, order_row, setup_state,
};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use uuid::Uuid;
use warkop_api::{
    dto::{
        menu::{CreateMenuItemRequest, UpdateMenuItemRequest},
        orders::{OrderItemInput, UpdateOrderRequest},
    },
    entity::{
        self,
        orders::{OrderStatus, PaymentMethod},
        users::UserRole,
    },
    error::AppError,
    routes::params::{MenuQuery, OrderListQuery},
    services::{
        menu_service,
        order_number::next_order_number_with,
        order_service::{self, conflict_on_duplicate},
    },
};

fn bad_request<T: std::fmt::Debug>(result: Result<T, AppError>) -> String {
    match result {
        Err(AppError::BadRequest(msg)) => msg,
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[tokio::test]
async fn small_order_pays_delivery_fee() {
    let state = setup_state().await;
    configure_delivery(&state).await;
    let kopi = create_category(&state, "Kopi").await;
    let hitam = create_menu_item(&state, kopi, "Kopi Hitam", 15000).await;

    let resp = order_service::create_order(&state, order_request(vec![line(&hitam, 1)]))
        .await
        .unwrap();
    assert!(resp.success);
    assert_eq!(resp.message, "Order created successfully");

    let created = resp.data.unwrap();
    assert_eq!(created.order.subtotal, 15000);
    assert_eq!(created.order.delivery_fee, 5000);
    assert_eq!(created.order.total_amount, 20000);
    assert_eq!(created.order.status, OrderStatus::Pending);
    assert_eq!(created.order.payment_method, PaymentMethod::Cash);
    assert!(created.order.order_number.starts_with("WK"));
    assert_eq!(created.order.order_number.len(), 14);
    assert_eq!(created.items.len(), 1);
    assert_eq!(created.items[0].menu_name, "Kopi Hitam");
}

#[tokio::test]
async fn order_at_minimum_ships_free() {
    let state = setup_state().await;
    configure_delivery(&state).await;
    let makanan = create_category(&state, "Makanan").await;
    let nasi = create_menu_item(&state, makanan, "Nasi Goreng", 25000).await;
    let mie = create_menu_item(&state, makanan, "Mie Goreng", 22000).await;

    let created = order_service::create_order(
        &state,
        order_request(vec![line(&nasi, 1), line(&mie, 2)]),
    )
    .await
    .unwrap()
    .data
    .unwrap();

    assert_eq!(created.order.subtotal, 69000);
    assert_eq!(created.order.delivery_fee, 0);
    assert_eq!(created.order.total_amount, 69000);
    assert_eq!(created.order.items_summary, "1x Nasi Goreng, 2x Mie Goreng");
    assert_eq!(created.items[1].subtotal, 44000);
}

#[tokio::test]
async fn missing_delivery_settings_mean_no_fee() {
    let state = setup_state().await;
    let minuman = create_category(&state, "Minuman").await;
    let teh = create_menu_item(&state, minuman, "Es Teh Manis", 8000).await;

    let created = order_service::create_order(&state, order_request(vec![line(&teh, 1)]))
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(created.order.delivery_fee, 0);
    assert_eq!(created.order.total_amount, 8000);
}

#[tokio::test]
async fn unknown_item_rolls_back_whole_order() {
    let state = setup_state().await;
    let kopi = create_category(&state, "Kopi").await;
    let susu = create_menu_item(&state, kopi, "Kopi Susu", 18000).await;
    let missing = Uuid::new_v4();

    let msg = bad_request(
        order_service::create_order(
            &state,
            order_request(vec![
                line(&susu, 1),
                OrderItemInput {
                    id: Some(missing),
                    quantity: Some(1),
                    price: Some(10000),
                    notes: None,
                },
            ]),
        )
        .await,
    );
    assert_eq!(msg, format!("Menu item {missing} not found"));
    assert_eq!(count(&state, entity::Orders).await, 0);
    assert_eq!(count(&state, entity::OrderItems).await, 0);
}

#[tokio::test]
async fn validation_errors_touch_nothing() {
    let state = setup_state().await;
    let kopi = create_category(&state, "Kopi").await;
    let tubruk = create_menu_item(&state, kopi, "Kopi Tubruk", 12000).await;

    let mut no_phone = order_request(vec![line(&tubruk, 1)]);
    if let Some(customer) = no_phone.customer.as_mut() {
        customer.phone = Some("   ".into());
    }
    assert_eq!(
        bad_request(order_service::create_order(&state, no_phone).await),
        "Customer name, phone, and address are required"
    );

    assert_eq!(
        bad_request(order_service::create_order(&state, order_request(vec![])).await),
        "Customer data and items are required"
    );

    assert_eq!(
        bad_request(order_service::create_order(&state, order_request(vec![line(&tubruk, 0)])).await),
        "Invalid item data"
    );
    assert_eq!(count(&state, entity::Orders).await, 0);
}

#[tokio::test]
async fn price_snapshot_survives_menu_changes() {
    let state = setup_state().await;
    let admin = create_user(&state, "admin", "rahasia", UserRole::Admin).await;
    let snack = create_category(&state, "Snack").await;
    let roti = create_menu_item(&state, snack, "Roti Bakar", 15000).await;

    let created = order_service::create_order(&state, order_request(vec![line(&roti, 2)]))
        .await
        .unwrap()
        .data
        .unwrap();

    menu_service::update_menu_item(
        &state,
        &admin,
        roti.id,
        UpdateMenuItemRequest {
            name: Some("Roti Bakar Coklat".into()),
            price: Some(20000),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    menu_service::delete_menu_item(&state, &admin, roti.id)
        .await
        .unwrap();

    let menu = menu_service::list_menu(&state, MenuQuery::default())
        .await
        .unwrap()
        .data
        .unwrap();
    assert!(menu.items.is_empty());
    assert!(matches!(
        menu_service::get_menu_item(&state, roti.id).await,
        Err(AppError::NotFound(_))
    ));

    let order = order_service::get_order(&state, &admin, created.order.id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(order.items[0].price, 15000);
    assert_eq!(order.items[0].subtotal, 30000);
    assert_eq!(order.items[0].menu_name, "Roti Bakar");
    assert_eq!(order.order.total_amount, 30000);

    let msg = bad_request(
        order_service::create_order(&state, order_request(vec![line(&roti, 1)])).await,
    );
    assert_eq!(msg, "Menu item Roti Bakar Coklat is not available");
}

#[tokio::test]
async fn status_moves_forward_only() {
    let state = setup_state().await;
    let staff = create_user(&state, "kasir", "rahasia", UserRole::Staff).await;
    let kopi = create_category(&state, "Kopi").await;
    let hitam = create_menu_item(&state, kopi, "Kopi Hitam", 15000).await;
    let order_id = order_service::create_order(&state, order_request(vec![line(&hitam, 2)]))
        .await
        .unwrap()
        .data
        .unwrap()
        .order
        .id;

    let status = |s: OrderStatus| UpdateOrderRequest {
        status: Some(s),
        ..Default::default()
    };

    let updated = order_service::update_order(&state, &staff, order_id, status(OrderStatus::Confirmed))
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(updated.order.status, OrderStatus::Confirmed);

    let msg = bad_request(
        order_service::update_order(&state, &staff, order_id, status(OrderStatus::Pending)).await,
    );
    assert_eq!(msg, "Cannot change order status from confirmed to pending");

    order_service::update_order(&state, &staff, order_id, status(OrderStatus::Delivered))
        .await
        .unwrap();
    let msg = bad_request(
        order_service::update_order(&state, &staff, order_id, status(OrderStatus::Cancelled)).await,
    );
    assert_eq!(msg, "Cannot change order status from delivered to cancelled");

    assert_eq!(
        bad_request(
            order_service::update_order(&state, &staff, order_id, UpdateOrderRequest::default())
                .await
        ),
        "No fields to update"
    );
    assert!(matches!(
        order_service::update_order(&state, &staff, Uuid::new_v4(), status(OrderStatus::Ready)).await,
        Err(AppError::NotFound(_))
    ));

    let stats = order_service::order_stats(&state, &staff)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.delivered_revenue, 30000);
    let delivered = stats
        .by_status
        .iter()
        .find(|c| c.status == OrderStatus::Delivered)
        .unwrap();
    assert_eq!(delivered.count, 1);
}

#[tokio::test]
async fn list_is_paginated_and_filterable() {
    let state = setup_state().await;
    let staff = create_user(&state, "kasir", "rahasia", UserRole::Staff).await;
    let kopi = create_category(&state, "Kopi").await;
    let hitam = create_menu_item(&state, kopi, "Kopi Hitam", 15000).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let created = order_service::create_order(&state, order_request(vec![line(&hitam, 1)]))
            .await
            .unwrap()
            .data
            .unwrap();
        ids.push(created.order.id);
    }
    let cancelled = entity::Orders::find_by_id(ids[0])
        .one(&state.orm)
        .await
        .unwrap()
        .unwrap();
    let mut active = cancelled.into_active_model();
    active.status = Set(OrderStatus::Cancelled);
    active.update(&state.orm).await.unwrap();

    let page = order_service::list_orders(
        &state,
        &staff,
        OrderListQuery {
            status: None,
            limit: Some(2),
            offset: Some(0),
        },
    )
    .await
    .unwrap();
    let pagination = page.pagination.unwrap();
    assert_eq!(pagination.total, 3);
    assert_eq!(pagination.pages, 2);
    assert_eq!(page.data.unwrap().items.len(), 2);

    let pending = order_service::list_orders(
        &state,
        &staff,
        OrderListQuery {
            status: Some(OrderStatus::Pending),
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.pagination.unwrap().total, 2);
    let items = pending.data.unwrap().items;
    assert!(items.iter().all(|o| o.status == OrderStatus::Pending));
    assert!(items.iter().all(|o| o.items_summary == "1x Kopi Hitam"));
}

#[tokio::test]
async fn delete_removes_order_and_items() {
    let state = setup_state().await;
    let staff = create_user(&state, "kasir", "rahasia", UserRole::Staff).await;
    let kopi = create_category(&state, "Kopi").await;
    let hitam = create_menu_item(&state, kopi, "Kopi Hitam", 15000).await;
    let susu = create_menu_item(&state, kopi, "Kopi Susu", 18000).await;

    let order_id = order_service::create_order(
        &state,
        order_request(vec![line(&hitam, 1), line(&susu, 1)]),
    )
    .await
    .unwrap()
    .data
    .unwrap()
    .order
    .id;
    assert_eq!(count(&state, entity::OrderItems).await, 2);

    order_service::delete_order(&state, &staff, order_id)
        .await
        .unwrap();
    assert_eq!(count(&state, entity::Orders).await, 0);
    assert_eq!(count(&state, entity::OrderItems).await, 0);

    assert!(matches!(
        order_service::delete_order(&state, &staff, order_id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn duplicate_menu_names_are_allowed() {
    let state = setup_state().await;
    let admin = create_user(&state, "admin", "rahasia", UserRole::Admin).await;
    let kopi = create_category(&state, "Kopi").await;
    let minuman = create_category(&state, "Minuman").await;

    for category in [kopi, minuman] {
        menu_service::create_menu_item(
            &state,
            &admin,
            CreateMenuItemRequest {
                name: Some("Es Kopi Susu".into()),
                price: Some(18000),
                category_id: Some(category),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }
    assert_eq!(count(&state, entity::MenuItems).await, 2);
}

#[tokio::test]
async fn order_number_retries_past_taken_values() {
    let state = setup_state().await;
    order_row("WK20250101AAAA").insert(&state.orm).await.unwrap();

    let mut candidates = ["WK20250101AAAA", "WK20250101BBBB"].into_iter();
    let number = next_order_number_with(&state.orm, || {
        candidates.next().unwrap().to_string()
    })
    .await
    .unwrap();
    assert_eq!(number, "WK20250101BBBB");

    let mut attempts = 0;
    let exhausted = next_order_number_with(&state.orm, || {
        attempts += 1;
        "WK20250101AAAA".to_string()
    })
    .await;
    assert!(matches!(exhausted, Err(AppError::Conflict(_))));
    assert_eq!(attempts, 8);
}

#[tokio::test]
async fn duplicate_order_number_insert_is_a_conflict() {
    let state = setup_state().await;
    order_row("WK20250101CAFE").insert(&state.orm).await.unwrap();

    let err = order_row("WK20250101CAFE")
        .insert(&state.orm)
        .await
        .unwrap_err();
    assert!(matches!(conflict_on_duplicate(err), AppError::Conflict(_)));
}

#[tokio::test]
async fn update_rejects_overlong_customer_fields() {
    let state = setup_state().await;
    let staff = create_user(&state, "kasir", "rahasia", UserRole::Staff).await;
    let kopi = create_category(&state, "Kopi").await;
    let hitam = create_menu_item(&state, kopi, "Kopi Hitam", 15000).await;
    let order_id = order_service::create_order(&state, order_request(vec![line(&hitam, 1)]))
        .await
        .unwrap()
        .data
        .unwrap()
        .order
        .id;

    let msg = bad_request(
        order_service::update_order(
            &state,
            &staff,
            order_id,
            UpdateOrderRequest {
                customer_phone: Some("0".repeat(21)),
                ..Default::default()
            },
        )
        .await,
    );
    assert_eq!(msg, "customer_phone must be at most 20 characters");

    let msg = bad_request(
        order_service::update_order(
            &state,
            &staff,
            order_id,
            UpdateOrderRequest {
                customer_name: Some("B".repeat(101)),
                ..Default::default()
            },
        )
        .await,
    );
    assert_eq!(msg, "customer_name must be at most 100 characters");
}
