// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs behind jwt_auth_middleware, which rejects missing,
// malformed, tampered and expired tokens with 401 before the handler is
// reached, and leaves an AuthUser in the request extensions.
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/v1 (e.g., /api/v1/user/:id, /api/v1/settings/:user_id)

pub mod auth; // Token introspection
pub mod settings; // Per-user preferences
pub mod user; // Account management

pub use auth::whoami_get;
