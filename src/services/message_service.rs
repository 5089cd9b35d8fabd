use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::messages::{CreateMessageRequest, MessageList},
    entity::messages::{ActiveModel as MessageActive, Column as MessageCol, Entity as Messages},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::Message,
    response::{ApiResponse, Pagination},
    routes::params::MessageListQuery,
    services::validation::{EMAIL_MAX, NAME_MAX, SUBJECT_MAX, check_len},
    state::AppState,
};

const DEFAULT_SUBJECT: &str = "Pesan dari Website";

pub async fn create_message(
    state: &AppState,
    payload: CreateMessageRequest,
) -> AppResult<ApiResponse<Message>> {
    let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let (Some(name), Some(email), Some(body)) = (
        clean(payload.name),
        clean(payload.email),
        clean(payload.message),
    ) else {
        return Err(AppError::BadRequest(
            "Name, email, and message are required".into(),
        ));
    };
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }
    let subject = clean(payload.subject).unwrap_or_else(|| DEFAULT_SUBJECT.to_string());
    check_len("name", &name, NAME_MAX)?;
    check_len("email", &email, EMAIL_MAX)?;
    check_len("subject", &subject, SUBJECT_MAX)?;

    let model = MessageActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        subject: Set(subject),
        body: Set(body),
        is_read: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(message_id = %model.id, "contact message received");
    Ok(ApiResponse::success(
        "Message sent successfully",
        model.into(),
        None,
    ))
}

pub async fn list_messages(
    state: &AppState,
    user: &AuthUser,
    query: MessageListQuery,
) -> AppResult<ApiResponse<MessageList>> {
    ensure_staff(user)?;
    let (limit, offset) = query.page().normalize();

    let mut condition = Condition::all();
    if query.unread == Some(true) {
        condition = condition.add(MessageCol::IsRead.eq(false));
    }

    let finder = Messages::find()
        .filter(condition)
        .order_by_desc(MessageCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Message::from)
        .collect();

    Ok(ApiResponse::success(
        "Messages",
        MessageList { items },
        Some(Pagination::new(total, limit, offset)),
    ))
}

pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Message>> {
    ensure_staff(user)?;
    let existing = Messages::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".into()))?;

    let mut active: MessageActive = existing.into();
    active.is_read = Set(true);
    let model = active.update(&state.orm).await?;
    Ok(ApiResponse::success("Message marked as read", model.into(), None))
}

pub async fn delete_message(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;
    let result = Messages::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Message not found".into()));
    }

    audit::record(
        &state.orm,
        Some(user.user_id),
        "message_delete",
        "messages",
        serde_json::json!({ "message_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Message deleted successfully",
        serde_json::json!({}),
        None,
    ))
}
