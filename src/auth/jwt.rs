use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims carried by the bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

const TOKEN_LIFETIME_SECS: usize = 7 * 24 * 60 * 60;

/// Create a signed token for a user session.
pub fn create_jwt(user_id: i64, signing_key: &[u8]) -> anyhow::Result<String> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Validate a token and extract the user id, or `None` when the token is
/// invalid, expired, or carries a non-numeric subject.
pub fn verify_jwt(token: &str, signing_key: &[u8]) -> Option<i64> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).ok()?;
    token_data.claims.sub.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let key = b"test-signing-key";
        let token = create_jwt(42, key).unwrap();
        assert_eq!(verify_jwt(&token, key), Some(42));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = create_jwt(42, b"key-one").unwrap();
        assert_eq!(verify_jwt(&token, b"key-two"), None);
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(verify_jwt("not-a-token", b"key"), None);
    }
}
