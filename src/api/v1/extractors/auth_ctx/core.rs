use std::marker::PhantomData;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};

use crate::services::auth::error::DESC_MALFORMED;
use crate::services::auth::{AuthError, AuthGuard, Permission};

use super::Authorized;

/// Runs the auth guard for `P::NAME` against the request's `Authorization` header.
/// Rejects with the guard's `AuthError`, so the handler body never runs.
impl<P, S> FromRequestParts<S> for Authorized<P>
where
    P: Permission,
    Arc<AuthGuard>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| AuthError::InvalidHeader(DESC_MALFORMED))
            })
            .transpose()?;

        let guard = Arc::<AuthGuard>::from_ref(state);
        let claims = guard.authorize(P::NAME, header).await?;

        Ok(Authorized(claims, PhantomData))
    }
}
