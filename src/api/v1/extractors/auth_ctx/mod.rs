/*!
 * Authorization extractor
 *
 * Responsibility:
 * - Give handlers the verified claims of a request that holds one permission
 * - HTTP / axum glue lives in core, the type itself in types
 *
 * Public API:
 * - Authorized
 */

mod core;
mod types;

pub use types::Authorized;
