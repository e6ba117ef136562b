use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::blog::errors::BlogError;
use crate::domain::blog::models::BlogId;
use crate::domain::blog::models::BlogPost;
use crate::domain::blog::models::BlogSortField;
use crate::domain::blog::models::BlogTitle;
use crate::domain::blog::models::ListBlogsQuery;
use crate::domain::blog::models::SortOrder;
use crate::domain::blog::ports::BlogRepository;
use crate::domain::tag::parse_tags;
use crate::domain::tag::tags_to_strings;
use crate::domain::user::models::Username;

/// Raw column values of a `blogs` row.
struct StoredBlog {
    id: uuid::Uuid,
    title: String,
    content: String,
    author: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl StoredBlog {
    /// Values failing domain validation map to `DatabaseError`.
    fn into_post(self) -> Result<BlogPost, BlogError> {
        Ok(BlogPost {
            id: BlogId(self.id),
            title: BlogTitle::new(self.title).map_err(|e| corrupt("title", e))?,
            content: self.content,
            author: Username::new(self.author).map_err(|e| corrupt("author", e))?,
            tags: parse_tags(self.tags).map_err(|e| corrupt("tags", e))?,
            created_at: self.created_at,
        })
    }
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> BlogError {
    BlogError::DatabaseError(format!("stored {}: {}", column, err))
}

pub struct PostgresBlogRepository {
    pool: PgPool,
}

impl PostgresBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_blog(row: &PgRow) -> Result<BlogPost, BlogError> {
        StoredBlog {
            id: row.try_get("id").map_err(Self::database_error)?,
            title: row.try_get("title").map_err(Self::database_error)?,
            content: row.try_get("content").map_err(Self::database_error)?,
            author: row.try_get("author").map_err(Self::database_error)?,
            tags: row.try_get("tags").map_err(Self::database_error)?,
            created_at: row.try_get("created_at").map_err(Self::database_error)?,
        }
        .into_post()
    }

    fn database_error(err: sqlx::Error) -> BlogError {
        BlogError::DatabaseError(err.to_string())
    }

    fn write_error(err: sqlx::Error, title: &BlogTitle) -> BlogError {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() && db_err.constraint() == Some("blogs_title_key") {
                return BlogError::TitleAlreadyExists(title.to_string());
            }
        }
        BlogError::DatabaseError(err.to_string())
    }

    fn order_clause(query: &ListBlogsQuery) -> String {
        let column = match query.sort_by {
            BlogSortField::CreatedAt => "created_at",
            BlogSortField::Title => "title",
        };
        let direction = match query.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        // id breaks ties so pages never overlap
        format!("ORDER BY {column} {direction}, id {direction}")
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn create(&self, post: BlogPost) -> Result<BlogPost, BlogError> {
        sqlx::query(
            r#"
            INSERT INTO blogs (id, title, content, author, tags, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id.0)
        .bind(post.title.as_str())
        .bind(&post.content)
        .bind(post.author.as_str())
        .bind(tags_to_strings(&post.tags))
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(e, &post.title))?;

        Ok(post)
    }

    async fn find_by_title(&self, title: &BlogTitle) -> Result<Option<BlogPost>, BlogError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, content, author, tags, created_at
            FROM blogs
            WHERE title = $1
            "#,
        )
        .bind(title.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::database_error)?;

        row.as_ref().map(Self::row_to_blog).transpose()
    }

    async fn list(&self, query: &ListBlogsQuery) -> Result<Vec<BlogPost>, BlogError> {
        let sql = format!(
            "SELECT id, title, content, author, tags, created_at FROM blogs {} LIMIT $1 OFFSET $2",
            Self::order_clause(query)
        );

        let rows = sqlx::query(&sql)
            .bind(i64::from(query.limit))
            .bind(i64::from(query.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(Self::database_error)?;

        rows.iter().map(Self::row_to_blog).collect()
    }

    async fn update(&self, post: BlogPost) -> Result<BlogPost, BlogError> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET title = $3, content = $4, tags = $5
            WHERE id = $1 AND author = $2
            "#,
        )
        .bind(post.id.0)
        .bind(post.author.as_str())
        .bind(post.title.as_str())
        .bind(&post.content)
        .bind(tags_to_strings(&post.tags))
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(e, &post.title))?;

        if result.rows_affected() == 0 {
            return Err(BlogError::NotFound(post.title.to_string()));
        }

        Ok(post)
    }

    async fn delete(&self, id: &BlogId, author: &Username) -> Result<(), BlogError> {
        let result = sqlx::query(
            r#"
            DELETE FROM blogs
            WHERE id = $1 AND author = $2
            "#,
        )
        .bind(id.0)
        .bind(author.as_str())
        .execute(&self.pool)
        .await
        .map_err(Self::database_error)?;

        if result.rows_affected() == 0 {
            return Err(BlogError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
