use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Identity;
use chrono::Utc;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::DEFAULT_ROLE;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    // Verified against when the username is unknown, so both failures cost a derivation
    dummy_hash: Arc<str>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        let dummy_hash = authenticator.hash_password("").into();
        Self {
            repository,
            authenticator,
            dummy_hash,
        }
    }

    /// Run key derivation work off the async worker threads.
    async fn with_authenticator<T, F>(&self, f: F) -> Result<T, UserError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);
        tokio::task::spawn_blocking(move || f(&authenticator))
            .await
            .map_err(|e| UserError::Unknown(e.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password = command.password.as_str().to_string();
        let password_hash = self
            .with_authenticator(move |authenticator| authenticator.hash_password(&password))
            .await?;

        let user = User {
            id: UserId::new(),
            first_name: command.first_name,
            last_name: command.last_name,
            username: command.username,
            email: command.email,
            password_hash,
            role: DEFAULT_ROLE.to_string(),
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            role = %created_user.role,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError> {
        let LoginCommand { username, password } = command;

        let Some(user) = self.repository.find_by_username(&username).await? else {
            let dummy_hash = Arc::clone(&self.dummy_hash);
            self.with_authenticator(move |authenticator| {
                authenticator.verify_password(&password, &dummy_hash)
            })
            .await?;

            tracing::debug!(
                username = %username,
                reason = "unknown_user",
                "Login rejected"
            );
            return Err(UserError::InvalidCredentials);
        };

        let identity = Identity::new(user.role.clone(), user.display_name());
        let stored_hash = user.password_hash.clone();

        let result = self
            .with_authenticator(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, &identity)
            })
            .await?
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(
                        user_id = %user.id,
                        reason = "bad_credentials",
                        "Login rejected"
                    );
                    UserError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => {
                    tracing::error!(user_id = %user.id, error = %err, "Token issuance failed");
                    UserError::TokenIssuance(err.to_string())
                }
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginOutcome {
            user,
            token: result.access_token,
        })
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }
}
