// handlers/public/auth/mod.rs - Public authentication handlers
//
// Registration and credential exchange. Login is the only place tokens are
// minted; everything else presents them.

pub mod login; // POST /api/v1/user/login - exchange credentials for a JWT
pub mod register; // POST /api/v1/user - create a new account

pub use login::login_post;
pub use register::register_post;
