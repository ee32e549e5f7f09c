use anyhow::Context;
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use serde_json::{json, Map};

use crate::auth::{self, Claims};
use crate::cli::{utils::output_success, OutputFormat};

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a 24-hour token for a user")]
    Issue {
        #[arg(long, help = "Numeric user ID")]
        id: i64,
        #[arg(long, help = "User email")]
        email: String,
    },

    #[command(about = "Verify a token and print its claims")]
    Verify {
        #[arg(help = "Token, with or without the 'Bearer ' prefix")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { id, email } => {
            let token = auth::issuer()
                .issue(id, &email)
                .context("cannot issue token (is JWT_SECRET_KEY set?)")?;

            let mut data = Map::new();
            data.insert("token".to_string(), json!(token));
            output_success(output_format, "Issued token", &token, data)
        }
        TokenCommands::Verify { token } => {
            let token = token.strip_prefix("Bearer ").unwrap_or(token.as_str());
            let claims = auth::issuer().validate(token)?;

            let mut data = Map::new();
            data.insert("claims".to_string(), json!(claims));
            output_success(output_format, "Token is valid", &describe(&claims), data)
        }
    }
}

fn describe(claims: &Claims) -> String {
    let expires = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| claims.exp.to_string());
    format!(
        "user_id: {}\nemail:   {}\nexpires: {}",
        claims.user_id, claims.email, expires
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_claims() {
        let issued = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = Claims::new(7, "ada@example.com", issued);
        let text = describe(&claims);
        assert!(text.contains("user_id: 7"));
        assert!(text.contains("ada@example.com"));
        assert!(text.contains("2024-01-02T00:00:00+00:00"));
    }
}
