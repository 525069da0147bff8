/*
 * Responsibility
 * - Router-level middleware (request id, tracing, limits, CORS, security headers)
 */
pub mod cors;
pub mod http;
pub mod security_headers;
