//! User model and authentication types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public profile returned by `/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Registration request
///
/// Required fields are modelled as `Option` so that missing values surface as
/// field-keyed validation errors instead of a body-decoding failure.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        required(message = "The name field is required."),
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters.")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "The password field is required."),
        length(min = 6, message = "The password must be at least 6 characters.")
    )]
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// Login request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Registration response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Build claims for a user with the given expiry horizon
    pub fn for_user(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.email.clone(),
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

    fn test_user() -> User {
        User {
            id: 7,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: Some("hash".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let claims = UserClaims::for_user(&test_user(), 24);
        let token = claims.create_token("secret").expect("encode");
        let decoded = UserClaims::from_token(&token, "secret").expect("decode");
        assert_eq!(decoded.user_id, 7);
        assert_eq!(decoded.sub, "test@example.com");
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let claims = UserClaims::for_user(&test_user(), 24);
        let token = claims.create_token("secret").expect("encode");
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut claims = UserClaims::for_user(&test_user(), 24);
        claims.exp = claims.iat - 3600;
        let token = claims.create_token("secret").expect("encode");
        assert!(UserClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn test_password_never_serialized() {
        let json = serde_json::to_value(test_user()).expect("serialize");
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "test@example.com");
    }
}
