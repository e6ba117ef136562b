use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::BlogData;
use crate::blog::errors::BlogError;
use crate::blog::models::BlogTitle;
use crate::blog::models::CreateBlogCommand;
use crate::domain::tag::parse_tags;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// Any `author` in the body is ignored; the post belongs to the caller.
pub async fn create_blog(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<CreateBlogRequest>,
) -> Result<ApiSuccess<BlogData>, ApiError> {
    state
        .blog_service
        .create_blog(body.try_into_command()?, user.username)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::CREATED, post.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBlogRequest {
    title: String,
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl CreateBlogRequest {
    fn try_into_command(self) -> Result<CreateBlogCommand, BlogError> {
        Ok(CreateBlogCommand {
            title: BlogTitle::new(self.title)?,
            content: self.content,
            tags: parse_tags(self.tags)?,
        })
    }
}
