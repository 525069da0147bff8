//! Bearer credential extraction from the `Authorization` header value.

use super::error::{
    AuthError, DESC_BEARER_SCHEME, DESC_NOT_BEARER_TOKEN, DESC_TOKEN_NOT_FOUND,
};

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The token is returned verbatim; nothing is decoded here. Scheme and token may be
/// separated by any run of whitespace.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::HeaderMissing)?;

    let mut parts = header.split_whitespace();

    let scheme = parts
        .next()
        .ok_or(AuthError::InvalidHeader(DESC_BEARER_SCHEME))?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidHeader(DESC_BEARER_SCHEME));
    }

    let token = parts
        .next()
        .ok_or(AuthError::InvalidHeader(DESC_TOKEN_NOT_FOUND))?;

    if parts.next().is_some() {
        return Err(AuthError::InvalidHeader(DESC_NOT_BEARER_TOKEN));
    }

    Ok(token)
}
