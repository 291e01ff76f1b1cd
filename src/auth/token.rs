// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a server-held secret. A token carries
//! the user reference plus an absolute expiry and nothing else: validity is
//! decided by signature and expiry alone, so rotating the secret invalidates
//! every outstanding token.
//!
//! Verification checks the signature before looking at the expiry, and
//! expiry is strict: a token is expired at exactly `iat + ttl`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::Serialize;

use super::claims::{Claim, TokenClaims, UserRef};

/// Default token lifetime (100 hours).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 360_000;

/// Fatal misconfiguration of the token service.
///
/// Retrying cannot help; the process configuration has to be fixed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("token signing secret is missing or empty")]
    MissingSecret,

    #[error("token TTL must be positive, got {0}s")]
    InvalidTtl(i64),

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Why a presented token was rejected.
///
/// Kept distinct for logs only; clients always see the same rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

impl VerificationError {
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::Malformed => "malformed",
            VerificationError::BadSignature => "bad_signature",
            VerificationError::Expired => "expired",
        }
    }
}

/// Signed, self-contained identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues and verifies tokens with a fixed secret and TTL.
///
/// Built once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Errors
    /// `MissingSecret` for an empty secret, `InvalidTtl` for a non-positive TTL.
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Result<Self, ConfigurationError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(ConfigurationError::MissingSecret);
        }
        if ttl <= Duration::zero() {
            return Err(ConfigurationError::InvalidTtl(ttl.num_seconds()));
        }

        // Expiry is checked by hand against an explicit clock so the boundary
        // is exact; the library only verifies the signature and shape.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `claim`, expiring one TTL from now.
    ///
    /// `iat` and `exp` have one-second resolution, so two tokens for the same
    /// user issued within the same second are identical.
    pub fn issue(&self, claim: &Claim) -> Result<Token, ConfigurationError> {
        self.issue_at(claim, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, claim: &Claim, now: DateTime<Utc>) -> Result<Token, ConfigurationError> {
        let issued_at = now.timestamp();
        let claims = TokenClaims {
            user: UserRef {
                id: claim.user_id.clone(),
            },
            iat: issued_at,
            exp: issued_at + self.ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(Token)
            .map_err(|e| ConfigurationError::Signing(e.to_string()))
    }

    /// Verify `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<Claim, VerificationError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claim, VerificationError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    VerificationError::BadSignature
                }
                _ => VerificationError::Malformed,
            })?;

        if now.timestamp() >= data.claims.exp {
            return Err(VerificationError::Expired);
        }

        Ok(Claim {
            user_id: data.claims.user.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::TimeZone;

    const SECRET: &str = "test-secret-for-token-service";

    fn service() -> TokenService {
        TokenService::new(SECRET, Duration::seconds(DEFAULT_TOKEN_TTL_SECS)).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let result = TokenService::new("", Duration::seconds(60));
        assert_eq!(result.unwrap_err(), ConfigurationError::MissingSecret);
    }

    #[test]
    fn non_positive_ttl_is_a_configuration_error() {
        let result = TokenService::new(SECRET, Duration::zero());
        assert_eq!(result.unwrap_err(), ConfigurationError::InvalidTtl(0));
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let tokens = service();
        let claim = Claim::new("user_123");
        let token = tokens.issue(&claim).unwrap();
        assert_eq!(tokens.verify(token.as_str()), Ok(claim));
    }

    #[test]
    fn issue_instant_resolution_is_one_second() {
        let tokens = service();
        let claim = Claim::new("u1");
        let first = tokens.issue_at(&claim, t0()).unwrap();
        let same_second = tokens
            .issue_at(&claim, t0() + Duration::milliseconds(500))
            .unwrap();
        let next_second = tokens.issue_at(&claim, t0() + Duration::seconds(1)).unwrap();

        assert_eq!(first.as_str(), same_second.as_str());
        assert_ne!(first.as_str(), next_second.as_str());
    }

    #[test]
    fn token_from_other_secret_has_bad_signature() {
        let issuer = TokenService::new("secret-one", Duration::hours(1)).unwrap();
        let verifier = TokenService::new("secret-two", Duration::hours(1)).unwrap();
        let token = issuer.issue(&Claim::new("u1")).unwrap();
        assert_eq!(
            verifier.verify(token.as_str()),
            Err(VerificationError::BadSignature)
        );
    }

    #[test]
    fn expiry_boundary_is_exact() {
        let ttl = Duration::seconds(3600);
        let tokens = TokenService::new(SECRET, ttl).unwrap();
        let claim = Claim::new("u1");
        let token = tokens.issue_at(&claim, t0()).unwrap();

        assert_eq!(tokens.verify_at(token.as_str(), t0()), Ok(claim.clone()));
        assert_eq!(
            tokens.verify_at(token.as_str(), t0() + ttl - Duration::seconds(1)),
            Ok(claim)
        );
        assert_eq!(
            tokens.verify_at(token.as_str(), t0() + ttl),
            Err(VerificationError::Expired)
        );
        assert_eq!(
            tokens.verify_at(token.as_str(), t0() + ttl + Duration::days(30)),
            Err(VerificationError::Expired)
        );
    }

    #[test]
    fn mutating_any_byte_never_verifies() {
        let tokens = service();
        let token = tokens.issue_at(&Claim::new("u1"), t0()).unwrap();
        let bytes = token.as_str().as_bytes();

        for i in 0..bytes.len() {
            let mut mutated = bytes.to_vec();
            mutated[i] = if mutated[i] == b'A' { b'B' } else { b'A' };
            let mutated = String::from_utf8(mutated).unwrap();

            let result = tokens.verify_at(&mutated, t0());
            assert!(
                matches!(
                    result,
                    Err(VerificationError::BadSignature) | Err(VerificationError::Malformed)
                ),
                "mutation at byte {i} produced {result:?}"
            );
        }
    }

    #[test]
    fn garbage_is_malformed() {
        let tokens = service();
        assert_eq!(tokens.verify(""), Err(VerificationError::Malformed));
        assert_eq!(
            tokens.verify("not-a-token"),
            Err(VerificationError::Malformed)
        );
    }

    #[test]
    fn unsigned_token_is_rejected() {
        let tokens = service();
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(r#"{"user":{"id":"u1"},"iat":0,"exp":9999999999}"#);
        let forged = format!("{header}.{payload}.");

        assert!(tokens.verify(&forged).is_err());
    }

    #[test]
    fn tokens_from_different_instants_differ_and_both_verify() {
        let tokens = service();
        let claim = Claim::new("u1");
        let first = tokens.issue_at(&claim, t0()).unwrap();
        let second = tokens.issue_at(&claim, t0() + Duration::seconds(5)).unwrap();

        assert_ne!(first, second);
        let check_at = t0() + Duration::seconds(10);
        assert_eq!(tokens.verify_at(first.as_str(), check_at), Ok(claim.clone()));
        assert_eq!(tokens.verify_at(second.as_str(), check_at), Ok(claim));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", service());
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("redacted"));
    }
}
