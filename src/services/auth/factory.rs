/// Factory: build the `AuthGuard` from application `Config`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::error::AppError;
use crate::services::auth::AuthGuard;
use crate::services::auth::jwks::{HttpKeySetSource, JwksCache, JwksCachePolicy};
use crate::services::auth::verifier::TokenVerifier;

pub fn build_auth_guard(config: &AuthConfig) -> Result<Arc<AuthGuard>, AppError> {
    let source = HttpKeySetSource::new(config.jwks_url.clone(), config.jwks_fetch_timeout)
        .map_err(|e| {
            tracing::error!(error = %e, "failed to build JWKS client");
            AppError::Internal
        })?;

    let keys = Arc::new(JwksCache::new(
        Arc::new(source),
        JwksCachePolicy {
            ttl: config.jwks_cache_ttl,
            min_refresh_interval: config.jwks_min_refresh_interval,
        },
    ));

    let verifier = TokenVerifier::new(
        keys,
        &config.issuer,
        &config.audience,
        &config.algorithms,
        config.leeway_seconds,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "invalid token verifier configuration");
        AppError::Internal
    })?;

    Ok(Arc::new(AuthGuard::new(verifier)))
}
