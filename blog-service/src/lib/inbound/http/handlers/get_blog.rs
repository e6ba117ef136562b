use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::BlogData;
use crate::blog::errors::BlogError;
use crate::blog::models::BlogTitle;
use crate::inbound::http::router::AppState;

pub async fn get_blog(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<ApiSuccess<BlogData>, ApiError> {
    let title = BlogTitle::new(title).map_err(BlogError::from)?;

    state
        .blog_service
        .get_blog(&title)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::OK, post.into()))
}
