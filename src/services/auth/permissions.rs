//! Permission enforcement and the fixed permission vocabulary.
//!
//! Enforcement is a pure function of the claims and the required permission.

use super::{claims::Claims, error::AuthError};

/// Deny unless `required` is granted by the token (exact, case-sensitive match).
pub fn check_permissions(claims: &Claims, required: &str) -> Result<(), AuthError> {
    let granted = claims
        .permissions
        .as_deref()
        .ok_or(AuthError::PermissionsMissing)?;

    if !granted.iter().any(|p| p == required) {
        return Err(AuthError::Unauthorized);
    }

    Ok(())
}

/// A permission a route requires. Implemented by the zero-sized markers below so
/// handlers name the permission they need in their signature.
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

macro_rules! permissions {
    ($($(#[$meta:meta])* $ty:ident => $name:literal,)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $ty;

            impl Permission for $ty {
                const NAME: &'static str = $name;
            }
        )*

        /// Every permission string a route can require.
        pub const ALL: &[&str] = &[$($name),*];
    };
}

permissions! {
    GetActors => "get:actors",
    GetActorsDetail => "get:actors-detail",
    GetActorsMovies => "get:actors-movies",
    PostActors => "post:actors",
    /// Link a movie to an actor.
    PostActorsMovie => "post:actors-movie",
    PatchActors => "patch:actors",
    DeleteActors => "delete:actors",
    GetMovies => "get:movies",
    GetMoviesDetail => "get:movies-detail",
    GetMoviesActors => "get:movies-actors",
    PostMovies => "post:movies",
    /// Link an actor to a movie.
    PostMoviesActor => "post:movies-actor",
    PatchMovies => "patch:movies",
    DeleteMovies => "delete:movies",
}
