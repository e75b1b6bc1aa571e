//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use inkpot_common::{AppError, AppResult, Config, IdGenerator, validate_inline_media};
use inkpot_db::{
    entities::user,
    repositories::UserRepository,
};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

#[allow(clippy::expect_used)]
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// User service for registration, login, and profile flows.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
    max_inline_bytes: usize,
}

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(regex(path = *EMAIL_RE, message = "invalid email address"), length(max = 256))]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Input for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Input for updating a profile.
///
/// Absent fields are left untouched; present fields overwrite, including an
/// empty `avatar` or `bio` which clears the value. Email is fixed at
/// registration and cannot be changed here.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,

    pub avatar: Option<String>,

    #[validate(length(max = 2048))]
    pub bio: Option<String>,
}

/// Input for changing a password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub current_password: String,

    #[validate(length(min = 6, max = 128))]
    pub new_password: String,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(user_repo: UserRepository, config: &Config) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
            max_inline_bytes: config.media.max_inline_bytes,
        }
    }

    /// Register a new user.
    ///
    /// Username and email are checked for duplicates in a single combined
    /// lookup; either taken maps to Conflict.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        // Trim identity fields before the shape checks run
        let input = RegisterInput {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_string(),
            password: input.password,
        };
        input.validate()?;

        if self
            .user_repo
            .find_by_username_or_email(&input.username, &input.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Username or email already taken".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let user_id = self.id_gen.generate();

        let model = user::ActiveModel {
            id: Set(user_id),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(password_hash),
            avatar: Set(String::new()),
            bio: Set(user::DEFAULT_BIO.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Authenticate a user by username and password.
    ///
    /// Unknown username and wrong password both map to Unauthorized; the
    /// distinction only shows up in logs.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let Some(user) = self.user_repo.find_by_username(username.trim()).await? else {
            tracing::debug!(username, "Login failed: unknown username");
            return Err(AppError::Unauthorized);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Update a user's profile.
    ///
    /// Uniqueness of a changed username is validated before any column is
    /// written; on collision nothing is applied.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        let username = input.username.map(|u| u.trim().to_string());
        if let Some(u) = &username {
            if u.is_empty() {
                return Err(AppError::Validation("Username must not be empty".to_string()));
            }
            if self
                .user_repo
                .find_conflicting_username(u, user_id)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict("Username already taken".to_string()));
            }
        }

        if let Some(avatar) = &input.avatar
            && !avatar.is_empty()
        {
            validate_inline_media(avatar, self.max_inline_bytes)?;
        }

        let mut active: user::ActiveModel = user.into();
        if let Some(u) = username {
            active.username = Set(u);
        }
        if let Some(avatar) = input.avatar {
            active.avatar = Set(avatar);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(bio);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Change a user's password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        input.validate()?;

        let user = self.user_repo.get_by_id(user_id).await?;

        if !verify_password(&input.current_password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(hash_password(&input.new_password)?);
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await?;

        tracing::info!(user_id, "Password changed");

        Ok(())
    }
}

/// Hash a password with argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
