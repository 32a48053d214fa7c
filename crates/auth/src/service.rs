use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shelf_db::{CredentialStore, NewUser, StoreError, User};
use shelf_http::AppError;
use shelf_kernel::settings::AuthSettings;

use crate::password::{is_password_allowed, CredentialHasher};
use crate::token::TokenSigner;

/// Credentials posted to `/auth/register` and `/auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Both fields, or the validation error for the first blank one.
    fn require(&self) -> Result<(&str, &str), AppError> {
        let username = self
            .username
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| AppError::validation("username can't be blank"))?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::validation("password can't be blank"))?;
        Ok((username, password))
    }
}

/// The identity attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Response shape for register, login and `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    hasher: CredentialHasher,
    tokens: TokenSigner,
    enforce_password_policy: bool,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: CredentialHasher,
        tokens: TokenSigner,
    ) -> Self {
        Self {
            credentials,
            hasher,
            tokens,
            enforce_password_policy: false,
        }
    }

    pub fn from_settings(
        credentials: Arc<dyn CredentialStore>,
        settings: &AuthSettings,
    ) -> anyhow::Result<Self> {
        let service = Self::new(
            credentials,
            CredentialHasher::from_settings(settings)?,
            TokenSigner::new(&settings.jwt_secret),
        );
        Ok(service.with_password_policy(settings.enforce_password_policy))
    }

    /// Require new passwords to satisfy [`is_password_allowed`].
    pub fn with_password_policy(mut self, enforce: bool) -> Self {
        self.enforce_password_policy = enforce;
        self
    }

    pub async fn register(&self, form: &LoginForm) -> Result<AuthenticatedUser, AppError> {
        let (username, password) = form.require()?;

        if self.enforce_password_policy && !is_password_allowed(password) {
            return Err(AppError::validation("password is not strong enough"));
        }

        if self
            .credentials
            .find_by_username(username)
            .await
            .map_err(store_failure)?
            .is_some()
        {
            return Err(AppError::conflict("username taken"));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .credentials
            .insert(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|err| match err {
                // lost a race with a concurrent registration
                StoreError::Duplicate { .. } => AppError::conflict("username taken"),
                other => store_failure(other),
            })?;

        tracing::info!(user_id = %user.id, "user registered");
        self.issue(&user.into())
    }

    pub async fn login(&self, form: &LoginForm) -> Result<AuthenticatedUser, AppError> {
        let (username, password) = form.require()?;

        let user = self
            .credentials
            .find_by_username(username)
            .await
            .map_err(store_failure)?;

        let user = match user {
            Some(user) if self.hasher.verify(password, &user.password_hash)? => user,
            Some(_) => {
                tracing::info!("login rejected");
                return Err(invalid_credentials());
            }
            None => {
                self.hasher.verify_decoy(password);
                tracing::info!("login rejected");
                return Err(invalid_credentials());
            }
        };

        tracing::info!(user_id = %user.id, "user logged in");
        self.issue(&user.into())
    }

    /// Verify a token's signature and return its subject.
    pub fn verify(&self, token: &str) -> Result<String, AppError> {
        self.tokens
            .verify(token)
            .map(|claims| claims.sub)
            .map_err(|err| AppError::unauthorized("invalid_token", err.to_string()))
    }

    /// Verify a token and load the user it names.
    pub async fn resolve_user(&self, token: &str) -> Result<CurrentUser, AppError> {
        let subject = self.verify(token)?;

        self.credentials
            .find_by_id(&subject)
            .await
            .map_err(store_failure)?
            .map(CurrentUser::from)
            .ok_or_else(|| AppError::unauthorized("invalid_token", "user no longer exists"))
    }

    /// Sign a fresh token for an already resolved identity.
    pub fn issue(&self, user: &CurrentUser) -> Result<AuthenticatedUser, AppError> {
        let token = self
            .tokens
            .sign(&user.id)
            .map_err(|err| AppError::internal(anyhow::anyhow!("failed to sign token: {err}")))?;

        Ok(AuthenticatedUser {
            id: user.id.clone(),
            username: user.username.clone(),
            token,
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("invalid_credentials", "username or password is invalid")
}

fn store_failure(err: StoreError) -> AppError {
    AppError::internal(err)
}
