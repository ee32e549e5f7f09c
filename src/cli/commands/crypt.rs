use anyhow::Context;
use serde_json::{json, Map};

use crate::auth::cipher;
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::{self, ENCRYPTION_KEY_VAR};

pub fn encrypt(plaintext: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let payload = cipher::encrypt(&config::encryption_key(), plaintext)
        .with_context(|| format!("cannot encrypt with {}", ENCRYPTION_KEY_VAR))?;

    let mut data = Map::new();
    data.insert("payload".to_string(), json!(payload));
    output_success(output_format, "Encrypted", &payload, data)
}

pub fn decrypt(payload: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let plaintext = cipher::decrypt(&config::encryption_key(), payload)
        .with_context(|| format!("cannot decrypt with {}", ENCRYPTION_KEY_VAR))?;

    let mut data = Map::new();
    data.insert("plaintext".to_string(), json!(plaintext));
    output_success(output_format, "Decrypted", &plaintext, data)
}
