use thiserror::Error;

use crate::domain::blog::guard::OwnershipError;
use crate::domain::tag::TagError;

/// Error for BlogTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlogTitleError {
    #[error("Title is empty")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for list query parameters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListQueryError {
    #[error("Unknown sort field '{0}' (expected created_at or title)")]
    UnknownSortField(String),

    #[error("Unknown sort order '{0}' (expected asc or desc)")]
    UnknownSortOrder(String),
}

/// Top-level error for all blog operations
#[derive(Debug, Clone, Error)]
pub enum BlogError {
    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] BlogTitleError),

    #[error("Invalid tag: {0}")]
    InvalidTag(#[from] TagError),

    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] ListQueryError),

    #[error("Blog not found with title: {0}")]
    NotFound(String),

    #[error("Blog title already exists: {0}")]
    TitleAlreadyExists(String),

    #[error("You are not the author of this blog post")]
    Forbidden(#[from] OwnershipError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
