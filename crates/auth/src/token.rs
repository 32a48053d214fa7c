//! Stateless HS256 bearer tokens.
//!
//! Tokens carry only the subject and the issue time. No expiry is issued or
//! enforced: a token is a session-duration credential.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Issued at, unix seconds
    pub iat: i64,
}

#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn sign(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: time::OffsetDateTime::now_utc().unix_timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_token_verifies_to_subject() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.sign("user-123").unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(signer.verify(&token).unwrap().sub, "user-123");
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = TokenSigner::new("secret-one").sign("user-1").unwrap();
        assert!(TokenSigner::new("secret-two").verify(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let signer = TokenSigner::new("test-secret");
        let token = signer.sign("user-1").unwrap();
        let other = signer.sign("user-2").unwrap();

        // header.payload of one token with the signature of another
        let (head, _) = token.rsplit_once('.').unwrap();
        let (_, signature) = other.rsplit_once('.').unwrap();
        assert!(signer.verify(&format!("{head}.{signature}")).is_err());
        assert!(signer.verify("not.a.token").is_err());
        assert!(signer.verify("").is_err());
    }
}
