//! Authentication and user service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult, FieldErrors},
    models::user::{RegisterRequest, User, UserClaims, UserProfile},
    repository::Repository,
};

/// Hash a password using argon2 with a fresh salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user and immediately issue a token for them
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(User, String)> {
        request.validate()?;

        let (Some(name), Some(email), Some(password)) =
            (&request.name, &request.email, &request.password)
        else {
            return Err(AppError::Internal(
                "validated register payload is missing required fields".to_string(),
            ));
        };

        let mut errors = FieldErrors::new();

        if self.repository.users.email_exists(email).await? {
            errors.insert(
                "email".to_string(),
                vec!["The email has already been taken.".to_string()],
            );
        }

        // The confirmation field is optional on the wire; it only fails when
        // supplied and different from the password.
        if let Some(ref confirmation) = request.password_confirmation {
            if confirmation != password {
                errors
                    .entry("password".to_string())
                    .or_default()
                    .push("The password confirmation does not match.".to_string());
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .repository
            .users
            .create(name, email, &password_hash)
            .await?;

        tracing::info!("Registered user id={} email={}", user.id, user.email);

        let token = self.create_token_for_user(&user)?;
        Ok((user, token))
    }

    /// Authenticate by email and password and return a JWT token
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

        let valid = match user.password {
            Some(ref hash) => verify_password(hash, password)?,
            None => false,
        };
        if !valid {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        self.create_token_for_user(&user)
    }

    /// Public profile of the authenticated user
    pub async fn profile(&self, user_id: i32) -> AppResult<UserProfile> {
        let user = self.repository.users.get_by_id(user_id).await?;
        Ok(UserProfile::from(user))
    }

    /// Create a JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let claims = UserClaims::for_user(user, self.config.jwt_expiration_hours);
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("secret1").expect("hash");
        assert!(verify_password(&hash, "secret1").expect("verify"));
        assert!(!verify_password(&hash, "secret2").expect("verify"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("secret1").expect("hash");
        let second = hash_password("secret1").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(verify_password("not-a-hash", "secret1").is_err());
    }
}
