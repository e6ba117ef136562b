use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::blog::errors::BlogTitleError;
use crate::domain::blog::errors::ListQueryError;
use crate::domain::tag::TagSet;
use crate::domain::user::models::Username;

/// Blog post aggregate entity.
///
/// `author` is set from the authenticated user at creation and never changes.
#[derive(Debug, Clone)]
pub struct BlogPost {
    pub id: BlogId,
    pub title: BlogTitle,
    pub content: String,
    pub author: Username,
    pub tags: TagSet,
    pub created_at: DateTime<Utc>,
}

/// Blog post unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlogId(pub Uuid);

impl BlogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Blog title value type
///
/// Trimmed, 1-200 characters. Unique across posts; used as the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlogTitle(String);

impl BlogTitle {
    const MAX_LENGTH: usize = 200;

    /// Create a new validated title.
    ///
    /// # Errors
    /// * `Empty` - Title is empty after trimming
    /// * `TooLong` - Title exceeds 200 characters
    pub fn new(title: String) -> Result<Self, BlogTitleError> {
        let trimmed = title.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(BlogTitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(BlogTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlogTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a blog post. The author is supplied separately by the caller.
#[derive(Debug, Clone)]
pub struct CreateBlogCommand {
    pub title: BlogTitle,
    pub content: String,
    pub tags: TagSet,
}

/// Partial blog update. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateBlogCommand {
    pub title: Option<BlogTitle>,
    pub content: Option<String>,
    pub tags: Option<TagSet>,
}

impl UpdateBlogCommand {
    /// Apply the provided fields to `post`, keeping its id, author and creation time.
    pub fn apply_to(self, post: BlogPost) -> BlogPost {
        BlogPost {
            title: self.title.unwrap_or(post.title),
            content: self.content.unwrap_or(post.content),
            tags: self.tags.unwrap_or(post.tags),
            ..post
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSortField {
    #[default]
    CreatedAt,
    Title,
}

impl FromStr for BlogSortField {
    type Err = ListQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "title" => Ok(Self::Title),
            other => Err(ListQueryError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ListQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ListQueryError::UnknownSortOrder(s.to_string())),
        }
    }
}

/// Page request for listing blog posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListBlogsQuery {
    pub limit: u32,
    pub offset: u32,
    pub sort_by: BlogSortField,
    pub order: SortOrder,
}

impl ListBlogsQuery {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 100;

    /// Build a query, clamping `limit` to 1..=100.
    pub fn new(
        limit: Option<u32>,
        offset: Option<u32>,
        sort_by: BlogSortField,
        order: SortOrder,
    ) -> Self {
        Self {
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0),
            sort_by,
            order,
        }
    }
}

impl Default for ListBlogsQuery {
    fn default() -> Self {
        Self::new(None, None, BlogSortField::default(), SortOrder::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tag::parse_tags;

    #[test]
    fn test_title_trimmed() {
        let title = BlogTitle::new("  Hello ".to_string()).unwrap();
        assert_eq!(title.as_str(), "Hello");
    }

    #[test]
    fn test_title_invalid() {
        assert_eq!(BlogTitle::new(" ".to_string()), Err(BlogTitleError::Empty));
        assert_eq!(
            BlogTitle::new("t".repeat(201)),
            Err(BlogTitleError::TooLong {
                max: 200,
                actual: 201
            })
        );
    }

    #[test]
    fn test_list_query_defaults_and_clamping() {
        let query = ListBlogsQuery::default();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
        assert_eq!(query.sort_by, BlogSortField::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);

        let query = ListBlogsQuery::new(Some(0), None, BlogSortField::Title, SortOrder::Asc);
        assert_eq!(query.limit, 1);

        let query = ListBlogsQuery::new(Some(1000), Some(5), BlogSortField::Title, SortOrder::Asc);
        assert_eq!(query.limit, 100);
        assert_eq!(query.offset, 5);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("title".parse::<BlogSortField>(), Ok(BlogSortField::Title));
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!(
            "author".parse::<BlogSortField>(),
            Err(ListQueryError::UnknownSortField("author".to_string()))
        );
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_update_keeps_identity_and_author() {
        let post = BlogPost {
            id: BlogId::new(),
            title: BlogTitle::new("T".to_string()).unwrap(),
            content: "old".to_string(),
            author: Username::new("alice".to_string()).unwrap(),
            tags: TagSet::new(),
            created_at: Utc::now(),
        };
        let id = post.id;
        let created_at = post.created_at;

        let command = UpdateBlogCommand {
            content: Some("new".to_string()),
            tags: Some(parse_tags(vec!["rust".to_string()]).unwrap()),
            ..Default::default()
        };
        let updated = command.apply_to(post);

        assert_eq!(updated.id, id);
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.author.as_str(), "alice");
        assert_eq!(updated.title.as_str(), "T");
        assert_eq!(updated.content, "new");
        assert_eq!(updated.tags.len(), 1);
    }
}
