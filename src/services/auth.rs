//! Authentication and user registration service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{RegisterUser, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Token lifetime in seconds
    pub fn token_lifetime(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    /// Register a new user and log them in
    pub async fn register(&self, data: RegisterUser) -> AppResult<(String, User)> {
        data.validate()?;

        let username = data.username.trim();
        if self.repository.users.username_exists(username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let hash = self.hash_password(&data.password)?;
        let user = self.repository.users.create(username, &hash).await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Authenticate user by username and return JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            tracing::warn!(username = %user.username, "Failed login attempt");
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        UserClaims::new(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password with argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_password_hash_verifies() {
        let state = crate::api::test_support::lazy_state();
        let auth = &state.services.auth;

        let hash = auth.hash_password("correct horse").unwrap();
        let user = User {
            id: 1,
            username: "reader".to_string(),
            password: hash,
            created_at: Utc::now(),
        };

        assert!(auth.verify_password(&user, "correct horse").unwrap());
        assert!(!auth.verify_password(&user, "battery staple").unwrap());
    }

    #[tokio::test]
    async fn test_issued_token_matches_user() {
        let state = crate::api::test_support::lazy_state();
        let user = User {
            id: 42,
            username: "reader".to_string(),
            password: String::new(),
            created_at: Utc::now(),
        };

        let token = state.services.auth.create_token_for_user(&user).unwrap();
        let claims = UserClaims::from_token(&token, &state.config.auth.jwt_secret).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp - claims.iat, state.services.auth.token_lifetime());
    }
}
