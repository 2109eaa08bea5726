/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user
 * sessions. The same tokens authenticate REST requests (Authorization
 * header) and channel handshakes (token query parameter).
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Get JWT secret from environment
fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set, using development default");
        "your-secret-key-change-in-production".to_string()
    })
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `user_id` - User ID (UUID)
/// * `email` - User email
///
/// # Returns
/// JWT token string
pub fn create_token(
    user_id: uuid::Uuid,
    email: String,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    // Token expires in 30 days
    let exp = now + (30 * 24 * 60 * 60);

    let claims = Claims {
        sub: user_id.to_string(),
        email,
        exp,
        iat: now,
    };

    let secret = get_jwt_secret();
    let key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `token` - JWT token string
///
/// # Returns
/// Decoded claims or error
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = get_jwt_secret();
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_token() {
        let user_id = uuid::Uuid::new_v4();
        let email = "test@example.com".to_string();
        let result = create_token(user_id, email);
        assert!(result.is_ok());
        let token = result.unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_verify_token() {
        let user_id = uuid::Uuid::new_v4();
        let email = "test@example.com".to_string();
        let token = create_token(user_id, email.clone()).unwrap();

        let result = verify_token(&token);
        assert!(result.is_ok());
        let claims = result.unwrap();
        assert_eq!(claims.email, email);
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_verify_invalid_token() {
        let invalid_token = "invalid.token.here";
        let result = verify_token(invalid_token);
        assert!(result.is_err());
    }

    #[test]
    fn test_token_contains_user_info() {
        let user_id = uuid::Uuid::new_v4();
        let email = "test@example.com".to_string();
        let token = create_token(user_id, email.clone()).unwrap();

        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.email, email);
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let user_id = uuid::Uuid::new_v4();
        let token = create_token(user_id, "test@example.com".to_string()).unwrap();

        // Flip a character in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'a' { 'b' } else { 'a' });

        assert!(verify_token(&tampered).is_err());
    }
}
