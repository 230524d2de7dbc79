/// Notification preference routes
///
/// Both routes operate on the authenticated user's own row; there is no
/// way to read or change another user's preferences through the API.

use crate::{
    app::AppState,
    envelope::Envelope,
    error::{ApiError, ApiResult},
    extract::Json,
    middleware::auth::AuthUser,
    routes::double_option,
};
use axum::extract::State;
use mercado_shared::models::user::{UpdateNotificationPrefs, User};
use serde::{Deserialize, Serialize};

/// A user's notification preferences
#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    /// Email notifications enabled
    pub notify_email: bool,

    /// SMS notifications enabled
    pub notify_sms: bool,

    /// Push notifications enabled
    pub notify_push: bool,

    /// Registered push device token, if any
    pub push_token: Option<String>,
}

impl From<User> for PreferencesResponse {
    fn from(user: User) -> Self {
        Self {
            notify_email: user.notify_email,
            notify_sms: user.notify_sms,
            notify_push: user.notify_push,
            push_token: user.push_token,
        }
    }
}

/// Preference update request body
///
/// Absent fields keep their stored value; `"push_token": null` unregisters
/// the push device.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreferencesRequest {
    /// New email notification flag
    pub notify_email: Option<bool>,

    /// New SMS notification flag
    pub notify_sms: Option<bool>,

    /// New push notification flag
    pub notify_push: Option<bool>,

    /// New push token (`null` clears)
    #[serde(default, deserialize_with = "double_option")]
    pub push_token: Option<Option<String>>,
}

/// `GET /api/notificacoes/preferencias`
pub async fn get_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Envelope<PreferencesResponse>>> {
    let user = User::find_by_id(&state.db, auth.id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(Envelope::ok(user.into())))
}

/// `PUT /api/notificacoes/preferencias`
///
/// Partial update: an empty body is accepted and answers with the stored
/// preferences unchanged.
pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdatePreferencesRequest>,
) -> ApiResult<Json<Envelope<PreferencesResponse>>> {
    let user = User::update_notification_prefs(
        &state.db,
        auth.id,
        UpdateNotificationPrefs {
            notify_email: req.notify_email,
            notify_sms: req.notify_sms,
            notify_push: req.notify_push,
            push_token: req.push_token,
        },
    )
    .await?
    .ok_or_else(user_not_found)?;

    tracing::info!(user_id = auth.id, "Notification preferences updated");

    Ok(Json(Envelope::ok(user.into())))
}

// A valid token whose user row is gone means the account was deleted
fn user_not_found() -> ApiError {
    ApiError::NotFound("Usuário não encontrado".to_string())
}
