/*
 * Responsibility
 * - axum::extract::Path whose rejection renders as AppError (JSON error envelope)
 */
use axum::extract::FromRequestParts;

use crate::error::AppError;

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
