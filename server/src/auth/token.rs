use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Session tokens are valid for one hour from issue.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Signed payload carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 keys derived once from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKeys(..)")
    }
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user_id: Uuid, role: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = Utc::now().timestamp();
        self.sign(&Claims {
            id: user_id,
            role: role.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }

    /// Checks signature and expiry. No leeway: a token is dead the second
    /// `exp` passes.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
pub(crate) fn sign_for_test(keys: &TokenKeys, claims: &Claims) -> String {
    keys.sign(claims).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify() {
        let keys = TokenKeys::from_secret("test-secret");
        let user_id = Uuid::new_v4();

        let token = keys.issue(user_id, "user").unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.id, user_id);
        assert_eq!(claims.role, "user");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenKeys::from_secret("one")
            .issue(Uuid::new_v4(), "user")
            .unwrap();
        assert!(TokenKeys::from_secret("two").verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = TokenKeys::from_secret("test-secret");
        let now = Utc::now().timestamp();
        let token = sign_for_test(
            &keys,
            &Claims {
                id: Uuid::new_v4(),
                role: "user".to_string(),
                iat: now - 2 * TOKEN_TTL_SECS,
                exp: now - TOKEN_TTL_SECS,
            },
        );
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let keys = TokenKeys::from_secret("test-secret");
        assert!(keys.verify("not.a.jwt").is_err());
        assert!(keys.verify("").is_err());
    }
}
