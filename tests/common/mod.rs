#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait,
    PaginatorTrait, Schema, Set,
};
use uuid::Uuid;
use warkop_api::{
    config::AuthConfig,
    dto::orders::{CreateOrderRequest, CustomerInput, OrderItemInput},
    entity::{
        self, categories::ActiveModel as CategoryActive, menu_items::ActiveModel as MenuActive,
        menu_items::Model as MenuModel,
        orders::{ActiveModel as OrderActive, OrderStatus, PaymentMethod, PaymentStatus},
        users::ActiveModel as UserActive, users::UserRole,
    },
    middleware::auth::AuthUser,
    services::{auth_service::hash_password, settings_service},
    state::AppState,
};

pub const JWT_SECRET: &str = "test-secret";

/// Fresh in-memory SQLite database with every table created from the entities.
pub async fn setup_state() -> AppState {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    create_tables(&db).await;
    AppState::new(
        db,
        AuthConfig {
            jwt_secret: JWT_SECRET.into(),
            session_ttl_hours: 1,
            cookie_secure: false,
        },
    )
}

async fn create_tables(db: &DatabaseConnection) {
    let schema = Schema::new(DbBackend::Sqlite);
    let backend = db.get_database_backend();

    db.execute(backend.build(&schema.create_table_from_entity(entity::Users)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(entity::Categories)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(entity::MenuItems)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(entity::Orders)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(entity::OrderItems)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(entity::Settings)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(entity::Messages)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(entity::AuditLogs)))
        .await
        .unwrap();
}

pub async fn create_user(state: &AppState, username: &str, password: &str, role: UserRole) -> AuthUser {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        username: Set(username.into()),
        email: Set(format!("{username}@warkop.test")),
        password_hash: Set(hash_password(password).unwrap()),
        role: Set(role),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await
    .unwrap();

    AuthUser {
        user_id: user.id,
        role: user.role,
    }
}

pub async fn create_category(state: &AppState, name: &str) -> Uuid {
    CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        description: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await
    .unwrap()
    .id
}

pub async fn create_menu_item(
    state: &AppState,
    category_id: Uuid,
    name: &str,
    price: i64,
) -> MenuModel {
    let now = Utc::now();
    MenuActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        description: Set(Some(String::new())),
        price: Set(price),
        category_id: Set(Some(category_id)),
        image: Set(None),
        is_available: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await
    .unwrap()
}

/// delivery_fee 5000 below a 25000 minimum.
pub async fn configure_delivery(state: &AppState) {
    settings_service::upsert_setting(&state.orm, "delivery_fee", "5000", None)
        .await
        .unwrap();
    settings_service::upsert_setting(&state.orm, "minimum_order", "25000", None)
        .await
        .unwrap();
}

pub fn customer() -> CustomerInput {
    CustomerInput {
        name: Some("Budi Santoso".into()),
        phone: Some("081234567890".into()),
        address: Some("Jl. Merdeka No. 1, Bandung".into()),
        notes: Some("Rumah pagar hijau".into()),
    }
}

pub fn line(menu: &MenuModel, quantity: i32) -> OrderItemInput {
    OrderItemInput {
        id: Some(menu.id),
        quantity: Some(quantity),
        price: Some(menu.price),
        notes: None,
    }
}

pub fn order_request(items: Vec<OrderItemInput>) -> CreateOrderRequest {
    CreateOrderRequest {
        customer: Some(customer()),
        items: Some(items),
        payment_method: None,
    }
}

pub async fn count<E>(state: &AppState, _entity: E) -> u64
where
    E: EntityTrait,
    E::Model: Sync,
{
    E::find().count(&state.orm).await.unwrap()
}

/// Bare order row with a fixed order number and no items.
pub fn order_row(order_number: &str) -> OrderActive {
    let now = Utc::now();
    OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: Set(order_number.into()),
        customer_name: Set("Budi Santoso".into()),
        customer_phone: Set("081234567890".into()),
        customer_address: Set("Jl. Merdeka No. 1, Bandung".into()),
        customer_notes: Set(String::new()),
        subtotal: Set(15000),
        delivery_fee: Set(0),
        total_amount: Set(15000),
        status: Set(OrderStatus::Pending),
        payment_status: Set(PaymentStatus::Unpaid),
        payment_method: Set(PaymentMethod::Cash),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
}
