//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Short user representation embedded in other payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub username: String,
}

/// Register request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_password_confirmation"))]
pub struct RegisterUser {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub password_confirmation: String,
}

/// Usernames are stored trimmed, so the length rule applies to the trimmed value
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.trim().chars().count();
    if !(3..=150).contains(&len) {
        let mut err = ValidationError::new("length");
        err.message = Some("Username must be 3 to 150 characters".into());
        return Err(err);
    }
    Ok(())
}

fn validate_password_confirmation(user: &RegisterUser) -> Result<(), ValidationError> {
    if user.password != user.password_confirmation {
        let mut err = ValidationError::new("password_mismatch");
        err.message = Some("The two password fields didn't match".into());
        return Err(err);
    }
    Ok(())
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            exp: now + (expiration_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            username: "orwell".to_string(),
            password: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let claims = UserClaims::new(&user(), 1);
        let token = claims.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.sub, "orwell");
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = UserClaims::new(&user(), 1).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut claims = UserClaims::new(&user(), 1);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = claims.create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn test_register_validation() {
        let ok = RegisterUser {
            username: "borrower".into(),
            password: "correct horse".into(),
            password_confirmation: "correct horse".into(),
        };
        assert!(ok.validate().is_ok());

        let mismatch = RegisterUser {
            password_confirmation: "battery staple".into(),
            ..ok
        };
        assert!(mismatch.validate().is_err());

        let short = RegisterUser {
            username: "ab".into(),
            password: "short".into(),
            password_confirmation: "short".into(),
        };
        let errors = short.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_username_checked_after_trim() {
        for username in ["     ", "  ab  "] {
            let data = RegisterUser {
                username: username.into(),
                password: "correct horse".into(),
                password_confirmation: "correct horse".into(),
            };
            let errors = data.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("username"), "{:?}", username);
        }

        let padded = RegisterUser {
            username: "  abc  ".into(),
            password: "correct horse".into(),
            password_confirmation: "correct horse".into(),
        };
        assert!(padded.validate().is_ok());
    }
}
