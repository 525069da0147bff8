pub mod bearer;
pub mod claims;
pub mod error;
pub mod factory;
pub mod guard;
pub mod jwks;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::Claims;
pub use error::AuthError;
pub use factory::build_auth_guard;
pub use guard::AuthGuard;
pub use permissions::Permission;
