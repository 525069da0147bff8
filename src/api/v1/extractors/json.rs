/*
 * Responsibility
 * - axum::Json whose rejection renders as AppError (JSON error envelope)
 */
use axum::extract::FromRequest;

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
