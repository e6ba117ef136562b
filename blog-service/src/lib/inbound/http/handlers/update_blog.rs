use axum::extract::Path;
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
use crate::blog::models::UpdateBlogCommand;
use crate::domain::tag::parse_tags;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

/// HTTP request body for a partial blog update (raw JSON).
///
/// There is no author field; authorship cannot be transferred.
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateBlogRequest {
    fn try_into_command(self) -> Result<UpdateBlogCommand, BlogError> {
        let title = self.title.map(BlogTitle::new).transpose()?;
        let tags = self.tags.map(parse_tags).transpose()?;

        Ok(UpdateBlogCommand {
            title,
            content: self.content,
            tags,
        })
    }
}

pub async fn update_blog(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(title): Path<String>,
    Json(req): Json<UpdateBlogRequest>,
) -> Result<ApiSuccess<BlogData>, ApiError> {
    let title = BlogTitle::new(title).map_err(BlogError::from)?;
    let command = req.try_into_command()?;

    state
        .blog_service
        .update_blog(&title, command, &user.username)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::OK, post.into()))
}
