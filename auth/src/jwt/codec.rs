use std::str::FromStr;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Default bearer token lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// Issues and validates signed, time-bound bearer tokens.
///
/// Tokens are stateless JWTs carrying `sub`, `exp` and `iat`. The secret and
/// algorithm are fixed at construction; nothing about issued tokens is kept
/// server-side.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl: Duration,
}

impl TokenCodec {
    /// Create a codec signing with HS256 and the default 30 minute TTL.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            default_ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
        }
    }

    /// Create a codec from configuration values.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `algorithm` - Algorithm identifier (`HS256`, `HS384` or `HS512`)
    /// * `default_ttl` - Lifetime used by [`TokenCodec::issue_default`]
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Identifier is unknown or not an HMAC algorithm
    pub fn with_algorithm(
        secret: &[u8],
        algorithm: &str,
        default_ttl: Duration,
    ) -> Result<Self, TokenError> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| TokenError::UnsupportedAlgorithm(algorithm.to_string()))?;

        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            default_ttl,
        })
    }

    /// Lifetime applied by [`TokenCodec::issue_default`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` expiring `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims::for_subject(subject, ttl);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Issue a token for `subject` with the configured default lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_default(&self, subject: &str) -> Result<String, TokenError> {
        self.issue(subject, self.default_ttl)
    }

    /// Verify a token and return its subject.
    ///
    /// The signature is checked before the expiry, so a tampered token is
    /// reported as `InvalidSignature` even when it is also past `exp`.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature mismatch, malformed token, wrong
    ///   algorithm or missing claims
    /// * `Expired` - Current time is at or past `exp`
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.decode(token)?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked by `validate` without leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "Token rejected");
                TokenError::InvalidSignature
            })
    }
}
