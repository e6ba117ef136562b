use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::SubsecRound;
use chrono::Utc;

use crate::domain::tag::TagSet;
use crate::domain::user::models::AccessToken;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service for credentials, tokens and profiles.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    /// Hash verified against when the username has no account, so both
    /// login failures pay the same Argon2 cost.
    decoy_hash: OnceLock<String>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hashing and token codec, configured with the signing secret
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            decoy_hash: OnceLock::new(),
        }
    }

    fn decoy_hash(&self) -> &str {
        self.decoy_hash.get_or_init(|| {
            self.authenticator
                .hash_password("decoy-password")
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Failed to compute decoy password hash");
                    String::new()
                })
        })
    }

    async fn find_for_login(&self, username: &str) -> Result<Option<User>, UserError> {
        // A name that cannot exist is handled like an unknown user.
        match Username::new(username.to_string()) {
            Ok(username) => self.repository.find_by_username(&username).await,
            Err(_) => Ok(None),
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self.authenticator.hash_password(&command.password)?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            full_name: None,
            password_hash,
            tags: command.tags,
            created_at: Utc::now().trunc_subsecs(6),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError> {
        let user = self.find_for_login(username).await?;

        let stored_hash = match &user {
            Some(user) => user.password_hash.as_str(),
            None => self.decoy_hash(),
        };
        let verified = self.authenticator.verify_password(password, stored_hash);

        match user {
            Some(user) if verified => Ok(user),
            _ => {
                tracing::warn!(username = %username, "Authentication failed");
                Err(UserError::AuthFailure)
            }
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<AccessToken, UserError> {
        let user = self.authenticate(username, password).await?;

        let access_token = self.authenticator.issue_token(user.username.as_str())?;
        let expires_in = self.authenticator.token_ttl().num_seconds();

        tracing::info!(username = %user.username, "Access token issued");

        Ok(AccessToken::bearer(access_token, expires_in))
    }

    async fn resolve_current_user(&self, token: &str) -> Result<User, UserError> {
        let subject = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Bearer token rejected");
            UserError::from(e)
        })?;

        let username = Username::new(subject).map_err(|_| UserError::Unauthorized)?;

        self.repository
            .find_by_username(&username)
            .await?
            .ok_or_else(|| {
                tracing::warn!(username = %username, "Token subject no longer exists");
                UserError::Unauthorized
            })
    }

    async fn update_profile(
        &self,
        username: &Username,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        if command.is_empty() {
            return self
                .repository
                .find_by_username(username)
                .await?
                .ok_or_else(|| UserError::NotFound(username.to_string()));
        }

        self.repository.update_profile(username, command).await
    }

    async fn add_tags(&self, username: &Username, tags: TagSet) -> Result<User, UserError> {
        self.repository.add_tags(username, &tags).await
    }

    async fn remove_tags(&self, username: &Username, tags: TagSet) -> Result<User, UserError> {
        self.repository.remove_tags(username, &tags).await
    }
}
