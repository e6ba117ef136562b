use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::blog::errors::BlogError;
use crate::blog::models::BlogTitle;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn delete_blog(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(title): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let title = BlogTitle::new(title).map_err(BlogError::from)?;

    state
        .blog_service
        .delete_blog(&title, &user.username)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageData {
                    message: "Blog deleted successfully".to_string(),
                },
            )
        })
}
