use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::BlogData;
use crate::blog::errors::BlogError;
use crate::blog::models::BlogSortField;
use crate::blog::models::ListBlogsQuery;
use crate::blog::models::SortOrder;
use crate::inbound::http::router::AppState;

/// Query string for `GET /blogs`
#[derive(Debug, Default, Deserialize)]
pub struct ListBlogsParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl ListBlogsParams {
    fn try_into_query(self) -> Result<ListBlogsQuery, BlogError> {
        let sort_by = self
            .sort_by
            .as_deref()
            .map(str::parse::<BlogSortField>)
            .transpose()?
            .unwrap_or_default();
        let order = self
            .order
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()?
            .unwrap_or_default();

        Ok(ListBlogsQuery::new(self.limit, self.offset, sort_by, order))
    }
}

pub async fn list_blogs(
    State(state): State<AppState>,
    Query(params): Query<ListBlogsParams>,
) -> Result<ApiSuccess<Vec<BlogData>>, ApiError> {
    let query = params.try_into_query()?;

    state
        .blog_service
        .list_blogs(query)
        .await
        .map_err(ApiError::from)
        .map(|posts| ApiSuccess::new(StatusCode::OK, posts.iter().map(BlogData::from).collect()))
}
