//! Bearer-token verification.
//!
//! Verification is symmetric (HS256). Tokens signed with any other
//! algorithm are rejected by construction: the validation only admits the
//! configured algorithm. Expiry is enforced, and the token-kind claim must
//! equal `"access"` — a validly signed refresh token is not a credential
//! for this backend.

use crate::claims::{AccessClaims, TOKEN_TYPE_ACCESS};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use thiserror::Error;

/// Why a token failed verification.
///
/// The variants exist for diagnostics; the pipeline maps them all to an
/// authentication-class failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,
    /// Signature, structure, or claim decoding failed.
    #[error("invalid token")]
    Invalid,
    /// The token is valid but not of kind `"access"`.
    #[error("not an access token")]
    WrongKind,
}

/// Verifies access tokens against the shared issuer secret.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Creates a verifier for the given symmetric secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifies signature, expiry, and token kind, returning the claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            },
        )?;

        if data.claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(TokenError::WrongKind);
        }

        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};

    const SECRET: &str = "meridian-test-secret-for-unit-tests";

    fn valid_claims() -> AccessClaims {
        AccessClaims {
            iss: "test-issuer".to_string(),
            sub: "user-abc-123".to_string(),
            exp: get_current_timestamp() + 900,
            iat: get_current_timestamp(),
            jti: "jti-123".to_string(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            user_id: "user-abc-123".to_string(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            roles: vec!["ADMIN".to_string()],
            permissions: vec![
                "masterdata.master.category.view".to_string(),
                "masterdata.master.category.create".to_string(),
            ],
        }
    }

    fn sign(claims: &AccessClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("signing test token")
    }

    #[test]
    fn accepts_valid_access_token() {
        let verifier = TokenVerifier::new(SECRET);
        let claims = verifier.verify(&sign(&valid_claims(), SECRET)).expect("valid");
        assert_eq!(claims.user_id, "user-abc-123");
        assert_eq!(claims.jti, "jti-123");
    }

    #[test]
    fn rejects_expired_token() {
        let mut claims = valid_claims();
        claims.exp = get_current_timestamp() - 3600;
        claims.iat = get_current_timestamp() - 7200;

        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(
            verifier.verify(&sign(&claims, SECRET)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(&valid_claims(), "some-other-secret");
        assert_eq!(verifier.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn rejects_garbage_token() {
        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(verifier.verify("garbage-token"), Err(TokenError::Invalid));
    }

    #[test]
    fn rejects_refresh_token_kind() {
        let mut claims = valid_claims();
        claims.token_type = "refresh".to_string();

        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(
            verifier.verify(&sign(&claims, SECRET)),
            Err(TokenError::WrongKind)
        );
    }

    #[test]
    fn rejects_unexpected_signing_algorithm() {
        let claims = valid_claims();
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("signing test token");

        let verifier = TokenVerifier::new(SECRET);
        assert_eq!(verifier.verify(&token), Err(TokenError::Invalid));
    }
}
