// handlers/protected/settings/mod.rs - Per-user settings handlers
//
// GET|PUT /api/v1/settings/:user_id
// PUT     /api/v1/settings/:user_id/notifications
// PUT     /api/v1/settings/:user_id/privacy
// PUT     /api/v1/settings/:user_id/general
// PUT     /api/v1/settings/:user_id/custom
// GET     /api/v1/settings/:user_id/custom/:key
//
// The settings row is created together with the user, so a missing row
// means the user does not exist (404).

pub mod custom;
pub mod record;
pub mod sections;

pub use custom::{custom_get, custom_put};
pub use record::{settings_get, settings_put};
pub use sections::{general_put, notifications_put, privacy_put};
