pub mod settings_service;
pub mod user_service;

pub use settings_service::{SettingsError, SettingsService};
pub use user_service::{UserError, UserService};

/// Canned reply for the connectivity check endpoint
pub const TEST_MESSAGE: &str = "the work is mysterious and important";
