use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::menu::{CategoryList, CreateMenuItemRequest, MenuList, UpdateMenuItemRequest},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        menu_items::{ActiveModel as MenuActive, Column as MenuCol, Entity as MenuItems},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{Category, MenuItem},
    response::ApiResponse,
    routes::params::MenuQuery,
    services::validation::{IMAGE_MAX, NAME_MAX, check_len},
    state::AppState,
};

const ALL_CATEGORIES: &str = "all";

/// Available items, optionally narrowed to one category name.
pub async fn list_menu(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<MenuList>> {
    let mut condition = Condition::all().add(MenuCol::IsAvailable.eq(true));
    if let Some(category) = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
    {
        condition = condition.add(CategoryCol::Name.eq(category));
    }

    let items = MenuItems::find()
        .find_also_related(Categories)
        .filter(condition)
        .order_by_asc(CategoryCol::Name)
        .order_by_asc(MenuCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(item, category)| MenuItem::from_entity(item, category))
        .collect();

    Ok(ApiResponse::success("Menu", MenuList { items }, None))
}

/// Every item including unavailable ones, for the admin panel.
pub async fn list_all_menu(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<MenuList>> {
    ensure_staff(user)?;
    let items = MenuItems::find()
        .find_also_related(Categories)
        .order_by_asc(CategoryCol::Name)
        .order_by_asc(MenuCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(item, category)| MenuItem::from_entity(item, category))
        .collect();

    Ok(ApiResponse::success("Menu", MenuList { items }, None))
}

pub async fn get_menu_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItem>> {
    let item = find_with_category(state, id)
        .await?
        .filter(|item| item.is_available)
        .ok_or_else(menu_not_found)?;
    Ok(ApiResponse::success("Menu item", item, None))
}

pub async fn create_menu_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let (Some(name), Some(price), Some(category_id)) = (
        payload
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        payload.price,
        payload.category_id,
    ) else {
        return Err(AppError::BadRequest("Missing required fields".into()));
    };
    check_len("name", &name, NAME_MAX)?;
    if let Some(image) = payload.image.as_deref() {
        check_len("image", image, IMAGE_MAX)?;
    }
    validate_price(price)?;
    ensure_category_exists(state, category_id).await?;

    let now = Utc::now();
    let model = MenuActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(Some(payload.description.unwrap_or_default())),
        price: Set(price),
        category_id: Set(Some(category_id)),
        image: Set(payload.image),
        is_available: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(menu_item_id = %model.id, name = %model.name, "menu item created");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "menu_create",
        "menu_items",
        serde_json::json!({ "menu_item_id": model.id }),
    )
    .await;

    let item = find_with_category(state, model.id)
        .await?
        .ok_or_else(menu_not_found)?;
    Ok(ApiResponse::success(
        "Menu item created successfully",
        item,
        None,
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    ensure_admin(user)?;
    let existing = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(menu_not_found)?;

    let mut active: MenuActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        check_len("name", &name, NAME_MAX)?;
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
        active.price = Set(price);
    }
    if let Some(category_id) = payload.category_id {
        ensure_category_exists(state, category_id).await?;
        active.category_id = Set(Some(category_id));
    }
    if let Some(image) = payload.image {
        check_len("image", &image, IMAGE_MAX)?;
        active.image = Set(Some(image));
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    active.updated_at = Set(Utc::now().into());
    let model = active.update(&state.orm).await?;

    tracing::info!(menu_item_id = %model.id, "menu item updated");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "menu_update",
        "menu_items",
        serde_json::json!({ "menu_item_id": model.id, "price": model.price }),
    )
    .await;

    let item = find_with_category(state, model.id)
        .await?
        .ok_or_else(menu_not_found)?;
    Ok(ApiResponse::success(
        "Menu item updated successfully",
        item,
        None,
    ))
}

/// Soft delete: the row stays so historical order items keep their reference.
pub async fn delete_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let existing = MenuItems::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(menu_not_found)?;

    let mut active: MenuActive = existing.into();
    active.is_available = Set(false);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    tracing::info!(menu_item_id = %id, "menu item hidden");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "menu_delete",
        "menu_items",
        serde_json::json!({ "menu_item_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Menu item deleted successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(ApiResponse::success("Categories", CategoryList { items }, None))
}

async fn find_with_category(state: &AppState, id: Uuid) -> AppResult<Option<MenuItem>> {
    let found = MenuItems::find_by_id(id)
        .find_also_related(Categories)
        .one(&state.orm)
        .await?
        .map(|(item, category)| MenuItem::from_entity(item, category));
    Ok(found)
}

async fn ensure_category_exists(state: &AppState, id: Uuid) -> AppResult<()> {
    if Categories::find_by_id(id).one(&state.orm).await?.is_none() {
        return Err(AppError::BadRequest(format!("Category {id} not found")));
    }
    Ok(())
}

fn validate_price(price: i64) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    Ok(())
}

fn menu_not_found() -> AppError {
    AppError::NotFound("Menu item not found".into())
}
