use async_trait::async_trait;

use crate::domain::tag::TagSet;
use crate::domain::user::models::AccessToken;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for registration, login and current-user resolution.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, password and tags
    ///
    /// # Returns
    /// Created user entity (callers must not expose `password_hash`)
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Verify a username/password pair.
    ///
    /// # Errors
    /// * `AuthFailure` - Unknown user or wrong password (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError>;

    /// Verify credentials and issue a bearer token whose subject is the username.
    ///
    /// # Errors
    /// * `AuthFailure` - Unknown user or wrong password (indistinguishable)
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, UserError>;

    /// Resolve a bearer token to the user it was issued for.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token is forged, tampered or malformed
    /// * `Expired` - Token lifetime is over
    /// * `Unauthorized` - Subject no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn resolve_current_user(&self, token: &str) -> Result<User, UserError>;

    /// Apply a partial profile update.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        username: &Username,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError>;

    /// Add tags to the user's tag set (set union, idempotent).
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn add_tags(&self, username: &Username, tags: TagSet) -> Result<User, UserError>;

    /// Remove tags from the user's tag set (set difference, idempotent).
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn remove_tags(&self, username: &Username, tags: TagSet) -> Result<User, UserError>;
}

/// Credential store: persistence operations for the user aggregate.
///
/// Every mutation is a single atomic operation on one user record.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// The store's uniqueness constraint on username is the authority on
    /// duplicates, not a prior lookup.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Overwrite the provided profile fields.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        username: &Username,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError>;

    /// Set-union `tags` into the user's tags.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn add_tags(&self, username: &Username, tags: &TagSet) -> Result<User, UserError>;

    /// Set-difference `tags` out of the user's tags.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn remove_tags(&self, username: &Username, tags: &TagSet) -> Result<User, UserError>;
}
