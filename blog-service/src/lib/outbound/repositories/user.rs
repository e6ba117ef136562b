use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::tag::parse_tags;
use crate::domain::tag::tags_to_strings;
use crate::domain::tag::TagSet;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Raw column values of a `users` row.
struct StoredUser {
    id: uuid::Uuid,
    username: String,
    email: String,
    full_name: Option<String>,
    password_hash: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Values failing domain validation map to `DatabaseError`.
    fn into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            username: Username::new(self.username).map_err(|e| corrupt("username", e))?,
            email: EmailAddress::new(self.email).map_err(|e| corrupt("email", e))?,
            full_name: self.full_name,
            password_hash: self.password_hash,
            tags: parse_tags(self.tags).map_err(|e| corrupt("tags", e))?,
            created_at: self.created_at,
        })
    }
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> UserError {
    UserError::DatabaseError(format!("stored {}: {}", column, err))
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> Result<User, UserError> {
        StoredUser {
            id: row.try_get("id").map_err(Self::database_error)?,
            username: row.try_get("username").map_err(Self::database_error)?,
            email: row.try_get("email").map_err(Self::database_error)?,
            full_name: row.try_get("full_name").map_err(Self::database_error)?,
            password_hash: row.try_get("password_hash").map_err(Self::database_error)?,
            tags: row.try_get("tags").map_err(Self::database_error)?,
            created_at: row.try_get("created_at").map_err(Self::database_error)?,
        }
        .into_user()
    }

    fn database_error(err: sqlx::Error) -> UserError {
        UserError::DatabaseError(err.to_string())
    }

    /// Run a single-row `UPDATE ... RETURNING` and map a missing row to `NotFound`.
    async fn update_returning(
        &self,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
        username: &Username,
    ) -> Result<User, UserError> {
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::database_error)?
            .ok_or_else(|| UserError::NotFound(username.to_string()))?;

        Self::row_to_user(&row)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, full_name, password_hash, tags, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.full_name.as_deref())
        .bind(&user.password_hash)
        .bind(tags_to_strings(&user.tags))
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("users_username_key")
                {
                    return UserError::UsernameAlreadyExists(user.username.as_str().to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, full_name, password_hash, tags, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::database_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        username: &Username,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let query = sqlx::query(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                tags = COALESCE($4::text[], tags)
            WHERE username = $1
            RETURNING id, username, email, full_name, password_hash, tags, created_at
            "#,
        )
        .bind(username.as_str())
        .bind(command.email.as_ref().map(|e| e.as_str().to_string()))
        .bind(command.full_name)
        .bind(command.tags.as_ref().map(tags_to_strings));

        self.update_returning(query, username).await
    }

    async fn add_tags(&self, username: &Username, tags: &TagSet) -> Result<User, UserError> {
        // Union and dedup inside one statement; concurrent adds cannot lose tags.
        let query = sqlx::query(
            r#"
            UPDATE users
            SET tags = ARRAY(
                SELECT DISTINCT t FROM unnest(tags || $2::text[]) AS t ORDER BY t
            )
            WHERE username = $1
            RETURNING id, username, email, full_name, password_hash, tags, created_at
            "#,
        )
        .bind(username.as_str())
        .bind(tags_to_strings(tags));

        self.update_returning(query, username).await
    }

    async fn remove_tags(&self, username: &Username, tags: &TagSet) -> Result<User, UserError> {
        let query = sqlx::query(
            r#"
            UPDATE users
            SET tags = ARRAY(
                SELECT t FROM unnest(tags) AS t WHERE NOT (t = ANY($2::text[])) ORDER BY t
            )
            WHERE username = $1
            RETURNING id, username, email, full_name, password_hash, tags, created_at
            "#,
        )
        .bind(username.as_str())
        .bind(tags_to_strings(tags));

        self.update_returning(query, username).await
    }
}
