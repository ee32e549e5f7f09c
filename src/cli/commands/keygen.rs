use serde_json::{json, Map};

use crate::auth::cipher;
use crate::cli::{utils::output_success, OutputFormat};

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let key = cipher::generate_key();

    let mut data = Map::new();
    data.insert("key".to_string(), json!(key));
    data.insert("env".to_string(), json!(format!("ENCRYPTION_KEY={}", key)));

    output_success(output_format, "Generated AES-256 key", &key, data)
}
