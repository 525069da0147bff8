/*
 * Responsibility
 * - The type a handler names to require a permission
 * - Holding a value means the guard already accepted the request for `P`
 */
use std::marker::PhantomData;

use crate::services::auth::{Claims, Permission};

/// Verified claims of a request authorized for permission `P`.
///
/// ```ignore
/// async fn list_actors(Authorized(claims, _): Authorized<GetActors>) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Authorized<P: Permission>(pub Claims, pub PhantomData<P>);
