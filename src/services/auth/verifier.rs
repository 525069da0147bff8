use std::sync::Arc;

use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};
use thiserror::Error;

use super::claims::Claims;
use super::error::{
    AuthError, DESC_ALGORITHM_NOT_ALLOWED, DESC_MALFORMED, DESC_UNPARSABLE,
};
use super::jwks::JwksCache;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifierConfigError {
    #[error("algorithm allow-list is empty")]
    NoAlgorithms,
    #[error("symmetric algorithm {0:?} cannot verify provider-issued tokens")]
    SymmetricAlgorithm(Algorithm),
}

/// Access-token verifier for provider-issued (asymmetric) JWTs.
///
/// `jsonwebtoken::Validation` checks:
/// - signature
/// - `exp` (with `leeway`)
/// - `iss` and `aud` (because we set them), and that both are present
///
/// This type additionally:
/// - restricts the header `alg` to the configured allow-list before any key lookup
/// - requires the JWK's declared `alg` (if any) to equal the header `alg`
/// - rejects a token at the exact second of its expiry
#[derive(Clone, Debug)]
pub struct TokenVerifier {
    keys: Arc<JwksCache>,
    issuer: String,
    audience: String,
    algorithms: Vec<Algorithm>,
    leeway_seconds: u64,
}

impl TokenVerifier {
    pub fn new(
        keys: Arc<JwksCache>,
        issuer: &str,
        audience: &str,
        algorithms: &[Algorithm],
        leeway_seconds: u64,
    ) -> Result<Self, VerifierConfigError> {
        if algorithms.is_empty() {
            return Err(VerifierConfigError::NoAlgorithms);
        }
        if let Some(alg) = algorithms.iter().copied().find(|a| is_symmetric(*a)) {
            return Err(VerifierConfigError::SymmetricAlgorithm(alg));
        }

        Ok(Self {
            keys,
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            algorithms: algorithms.to_vec(),
            leeway_seconds,
        })
    }

    pub fn keys(&self) -> &JwksCache {
        &self.keys
    }

    /// Verify signature and standard claims, returning the decoded claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        // 1) Unverified header: only `kid` and `alg` are read from it.
        let header = jsonwebtoken::decode_header(token).map_err(|e| {
            tracing::debug!(error = ?e.kind(), "unparsable token header");
            AuthError::InvalidHeader(DESC_UNPARSABLE)
        })?;

        let kid = header
            .kid
            .as_deref()
            .ok_or(AuthError::InvalidHeader(DESC_MALFORMED))?;

        if !self.algorithms.contains(&header.alg) {
            tracing::debug!(alg = ?header.alg, "token algorithm not in allow-list");
            return Err(AuthError::InvalidHeader(DESC_ALGORITHM_NOT_ALLOWED));
        }

        // 2) Signing key.
        let key = self.keys.resolve(kid).await?;

        if let Some(alg) = key.algorithm
            && alg != header.alg
        {
            tracing::debug!(kid = %kid, key_alg = ?alg, alg = ?header.alg, "token alg differs from key alg");
            return Err(AuthError::InvalidHeader(DESC_ALGORITHM_NOT_ALLOWED));
        }

        // 3) + 4) Signature and standard claims.
        let data =
            jsonwebtoken::decode::<Claims>(token, &key.decoding_key, &self.validation(header.alg))
                .map_err(map_jwt_error)?;

        let claims = data.claims;

        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        if now >= claims.exp.saturating_add(self.leeway_seconds) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        // One algorithm per decode: jsonwebtoken requires every listed algorithm
        // to match the key family.
        let mut validation = Validation::new(alg);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = self.leeway_seconds;
        validation
    }
}

fn is_symmetric(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    let mapped = match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
        ErrorKind::MissingRequiredClaim(claim) if claim == "iss" || claim == "aud" => {
            AuthError::InvalidClaims
        }
        _ => AuthError::InvalidHeader(DESC_UNPARSABLE),
    };

    tracing::debug!(error = ?err.kind(), code = mapped.code(), "jwt validation failed");
    mapped
}
