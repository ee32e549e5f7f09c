// handlers/protected/user/mod.rs - User account handlers
//
// GET|PUT|DELETE /api/v1/user/:id
// GET            /api/v1/user/email/:email
// PUT            /api/v1/user/:id/password
// PUT            /api/v1/user/:id/activate
// PUT            /api/v1/user/:id/deactivate

pub mod account;
pub mod record;

pub use account::{activate_put, deactivate_put, password_put};
pub use record::{user_delete, user_get, user_get_by_email, user_put};
