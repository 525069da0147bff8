pub mod auth_ctx;
pub mod json;
pub mod path;
