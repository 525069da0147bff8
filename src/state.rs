/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - db: PgPool, auth: AuthGuard (which owns the signing-key cache)
 * - Cheap to Clone (Arc / pool handles inside)
 */
use std::sync::Arc;

use axum::extract::FromRef;

use crate::services::auth::AuthGuard;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: Arc<AuthGuard>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, auth: Arc<AuthGuard>) -> Self {
        Self { db, auth }
    }
}

impl FromRef<AppState> for Arc<AuthGuard> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
