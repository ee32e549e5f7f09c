pub mod cipher;
pub mod token;

use once_cell::sync::Lazy;

pub use cipher::CipherError;
pub use token::{Claims, TokenError, TokenIssuer, TOKEN_LIFETIME_HOURS};

use crate::config;

static ISSUER: Lazy<TokenIssuer> =
    Lazy::new(|| TokenIssuer::new(config::config().security.jwt_secret.as_bytes()));

/// Process-wide issuer keyed by the configured JWT secret.
pub fn issuer() -> &'static TokenIssuer {
    &ISSUER
}
