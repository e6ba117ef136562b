use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::tag::parse_tags;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn remove_tags(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(tags): Json<Vec<String>>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let tags = parse_tags(tags).map_err(UserError::from)?;

    state
        .auth_service
        .remove_tags(&user.username, tags)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
