//! Auth guard: header → verified claims → permission check.
//!
//! Stateless per call. The only state that outlives a request is the signing-key
//! cache inside the verifier.

use std::future::Future;

use super::bearer::bearer_token;
use super::claims::Claims;
use super::error::AuthError;
use super::permissions::check_permissions;
use super::verifier::TokenVerifier;

#[derive(Clone, Debug)]
pub struct AuthGuard {
    verifier: TokenVerifier,
}

impl AuthGuard {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Authorize one request for `required`.
    ///
    /// Extract → verify → enforce, returning the first failure unchanged.
    pub async fn authorize(&self, required: &str, header: Option<&str>) -> Result<Claims, AuthError> {
        match self.run(required, header).await {
            Ok(claims) => {
                tracing::debug!(
                    permission = %required,
                    sub = claims.subject().unwrap_or("-"),
                    "request authorized"
                );
                Ok(claims)
            }
            Err(err) if err.is_operational() => {
                tracing::error!(permission = %required, error = %err, "authorization unavailable");
                Err(err)
            }
            Err(err) => {
                tracing::warn!(
                    permission = %required,
                    code = err.code(),
                    error = %err,
                    "authorization denied"
                );
                Err(err)
            }
        }
    }

    /// Run `operation` with the verified claims, or not at all.
    pub async fn guarded<F, Fut, T>(
        &self,
        required: &str,
        header: Option<&str>,
        operation: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(required, header).await?;
        Ok(operation(claims).await)
    }

    async fn run(&self, required: &str, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = bearer_token(header)?;
        let claims = self.verifier.verify(token).await?;
        check_permissions(&claims, required)?;
        Ok(claims)
    }
}
