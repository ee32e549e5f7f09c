// handlers/mod.rs - Two-tier handler architecture
//
// Public (no auth) → Protected (Bearer JWT, see middleware::auth)
//
// Everything is served under /api/v1; the router in main.rs attaches the
// JWT middleware to the protected tier only.
pub mod public; // Tier 1: registration, login, connectivity check
pub mod protected; // Tier 2: user and settings management, whoami

use crate::error::ApiError;

/// Parse a numeric id from a path segment.
///
/// Ids are unsigned 32-bit on the wire; anything else is a 400.
pub(crate) fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<u32>()
        .map(i64::from)
        .map_err(|_| ApiError::bad_request("Invalid user ID"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_ids() {
        assert_eq!(parse_user_id("42").unwrap(), 42);
        assert_eq!(parse_user_id("0").unwrap(), 0);
        assert_eq!(parse_user_id("4294967295").unwrap(), 4_294_967_295);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        for raw in ["abc", "-1", "1.5", "", "4294967296", " 7"] {
            let err = parse_user_id(raw).unwrap_err();
            assert_eq!(err.message(), "Invalid user ID", "input {:?}", raw);
        }
    }
}
