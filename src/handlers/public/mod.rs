// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and account registration, plus the connectivity check.
//
// Security Level: None
// Route Prefix: /api/v1 (e.g., /api/v1/user, /api/v1/user/login, /api/v1/test)

pub mod auth;

pub use test::test_get;
