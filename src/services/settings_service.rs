use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};

use crate::{
    audit,
    dto::settings::{SettingList, UpdateSettingRequest},
    entity::settings::{ActiveModel as SettingActive, Column as SettingCol, Entity as Settings},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Setting,
    response::ApiResponse,
    services::pricing::{DELIVERY_FEE_KEY, DeliveryFees, MINIMUM_ORDER_KEY},
    state::AppState,
};

/// Raw value for `key`, if present.
pub async fn get_setting<C: ConnectionTrait>(db: &C, key: &str) -> AppResult<Option<String>> {
    let value = Settings::find_by_id(key.to_string())
        .one(db)
        .await?
        .map(|s| s.setting_value);
    Ok(value)
}

pub async fn delivery_fees<C: ConnectionTrait>(db: &C) -> AppResult<DeliveryFees> {
    let delivery_fee = get_setting(db, DELIVERY_FEE_KEY).await?;
    let minimum_order = get_setting(db, MINIMUM_ORDER_KEY).await?;
    Ok(DeliveryFees::from_settings(
        delivery_fee.as_deref(),
        minimum_order.as_deref(),
    ))
}

/// Insert or overwrite a setting.
pub async fn upsert_setting<C: ConnectionTrait>(
    db: &C,
    key: &str,
    value: &str,
    description: Option<String>,
) -> AppResult<Setting> {
    let now = Utc::now();
    let existing = Settings::find_by_id(key.to_string()).one(db).await?;
    let model = match existing {
        Some(row) => {
            let mut active: SettingActive = row.into();
            active.setting_value = Set(value.to_string());
            if description.is_some() {
                active.description = Set(description);
            }
            active.updated_at = Set(now.into());
            active.update(db).await?
        }
        None => {
            SettingActive {
                setting_key: Set(key.to_string()),
                setting_value: Set(value.to_string()),
                description: Set(description),
                updated_at: Set(now.into()),
            }
            .insert(db)
            .await?
        }
    };
    Ok(model.into())
}

pub async fn list_settings(state: &AppState) -> AppResult<ApiResponse<SettingList>> {
    let items = Settings::find()
        .order_by_asc(SettingCol::SettingKey)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Setting::from)
        .collect();
    Ok(ApiResponse::success("Settings", SettingList { items }, None))
}

pub async fn update_setting(
    state: &AppState,
    user: &AuthUser,
    key: String,
    payload: UpdateSettingRequest,
) -> AppResult<ApiResponse<Setting>> {
    ensure_admin(user)?;
    let key = key.trim();
    if key.is_empty() || key.len() > 100 {
        return Err(AppError::BadRequest("Invalid setting key".into()));
    }
    validate_setting_value(key, &payload.value)?;

    let setting = upsert_setting(&state.orm, key, payload.value.trim(), payload.description).await?;

    tracing::info!(key = %setting.key, "setting updated");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "setting_update",
        "settings",
        serde_json::json!({ "key": setting.key }),
    )
    .await;

    Ok(ApiResponse::success("Setting updated successfully", setting, None))
}

fn validate_setting_value(key: &str, value: &str) -> AppResult<()> {
    if key == DELIVERY_FEE_KEY || key == MINIMUM_ORDER_KEY {
        match value.trim().parse::<i64>() {
            Ok(v) if v >= 0 => Ok(()),
            _ => Err(AppError::BadRequest(format!(
                "{key} must be a non-negative integer"
            ))),
        }
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validate_setting_value;

    #[test]
    fn amounts_must_be_non_negative_integers() {
        assert!(validate_setting_value("delivery_fee", "5000").is_ok());
        assert!(validate_setting_value("minimum_order", "-1").is_err());
        assert!(validate_setting_value("delivery_fee", "5.000").is_err());
        assert!(validate_setting_value("site_name", "Warkop Nusantara").is_ok());
    }
}
