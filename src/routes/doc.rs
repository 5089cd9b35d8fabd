use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        menu::{CategoryList, CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
        messages::{CreateMessageRequest, MessageList},
        orders::{
            CreateOrderRequest, CustomerInput, OrderItemInput, OrderList, OrderStats,
            OrderWithItems, StatusCount, UpdateOrderRequest,
        },
        settings::{SettingList, UpdateSettingRequest},
    },
    entity::{
        orders::{OrderStatus, PaymentMethod, PaymentStatus},
        users::UserRole,
    },
    error::ErrorBody,
    middleware::auth::SESSION_COOKIE,
    models::{Category, MenuItem, Message, Order, OrderItem, Setting, User},
    response::{ApiResponse, Pagination},
    routes::{admin, auth, health, menu, messages, orders, settings},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness_check,
        auth::login,
        auth::logout,
        auth::me,
        menu::list_menu,
        menu::get_menu_item,
        menu::create_menu_item,
        menu::update_menu_item,
        menu::delete_menu_item,
        menu::list_categories,
        orders::create_order,
        orders::list_orders,
        orders::order_stats,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        settings::list_settings,
        messages::create_message,
        admin::list_all_menu,
        admin::update_setting,
        admin::list_messages,
        admin::mark_message_read,
        admin::delete_message
    ),
    components(
        schemas(
            User,
            UserRole,
            Category,
            MenuItem,
            Order,
            OrderItem,
            OrderStatus,
            PaymentStatus,
            PaymentMethod,
            Setting,
            Message,
            ErrorBody,
            Pagination,
            LoginRequest,
            LoginResponse,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuList,
            CategoryList,
            CustomerInput,
            OrderItemInput,
            CreateOrderRequest,
            UpdateOrderRequest,
            OrderWithItems,
            OrderList,
            StatusCount,
            OrderStats,
            UpdateSettingRequest,
            SettingList,
            CreateMessageRequest,
            MessageList,
            health::HealthData,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<MenuList>,
            ApiResponse<MenuItem>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness checks"),
        (name = "Auth", description = "Admin panel session"),
        (name = "Menu", description = "Menu items and categories"),
        (name = "Orders", description = "Order placement and management"),
        (name = "Settings", description = "Café settings"),
        (name = "Messages", description = "Contact form"),
        (name = "Admin", description = "Admin panel endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
