use async_trait::async_trait;

use crate::domain::blog::errors::BlogError;
use crate::domain::blog::models::BlogId;
use crate::domain::blog::models::BlogPost;
use crate::domain::blog::models::BlogTitle;
use crate::domain::blog::models::CreateBlogCommand;
use crate::domain::blog::models::ListBlogsQuery;
use crate::domain::blog::models::UpdateBlogCommand;
use crate::domain::user::models::Username;

/// Port for blog post operations.
#[async_trait]
pub trait BlogServicePort: Send + Sync + 'static {
    /// Create a post authored by `author`.
    ///
    /// # Errors
    /// * `TitleAlreadyExists` - Another post already uses this title
    /// * `DatabaseError` - Database operation failed
    async fn create_blog(
        &self,
        command: CreateBlogCommand,
        author: Username,
    ) -> Result<BlogPost, BlogError>;

    /// List one page of posts.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_blogs(&self, query: ListBlogsQuery) -> Result<Vec<BlogPost>, BlogError>;

    /// # Errors
    /// * `NotFound` - No post with this title
    /// * `DatabaseError` - Database operation failed
    async fn get_blog(&self, title: &BlogTitle) -> Result<BlogPost, BlogError>;

    /// Partially update a post on behalf of `acting_user`.
    ///
    /// # Errors
    /// * `NotFound` - No post with this title (checked before ownership)
    /// * `Forbidden` - `acting_user` is not the author
    /// * `TitleAlreadyExists` - New title is taken by another post
    /// * `DatabaseError` - Database operation failed
    async fn update_blog(
        &self,
        title: &BlogTitle,
        command: UpdateBlogCommand,
        acting_user: &Username,
    ) -> Result<BlogPost, BlogError>;

    /// Delete a post on behalf of `acting_user`.
    ///
    /// # Errors
    /// * `NotFound` - No post with this title (checked before ownership)
    /// * `Forbidden` - `acting_user` is not the author
    /// * `DatabaseError` - Database operation failed
    async fn delete_blog(&self, title: &BlogTitle, acting_user: &Username)
        -> Result<(), BlogError>;
}

/// Persistence operations for blog posts.
#[async_trait]
pub trait BlogRepository: Send + Sync + 'static {
    /// # Errors
    /// * `TitleAlreadyExists` - Unique title constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, post: BlogPost) -> Result<BlogPost, BlogError>;

    async fn find_by_title(&self, title: &BlogTitle) -> Result<Option<BlogPost>, BlogError>;

    async fn list(&self, query: &ListBlogsQuery) -> Result<Vec<BlogPost>, BlogError>;

    /// Overwrite title, content and tags of the post with `post.id`, only
    /// while its author is still `post.author`.
    ///
    /// # Errors
    /// * `NotFound` - No such post for this author
    /// * `TitleAlreadyExists` - New title is taken by another post
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, post: BlogPost) -> Result<BlogPost, BlogError>;

    /// Delete the post with `id`, only while its author is `author`.
    ///
    /// # Errors
    /// * `NotFound` - No such post for this author
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &BlogId, author: &Username) -> Result<(), BlogError>;
}
