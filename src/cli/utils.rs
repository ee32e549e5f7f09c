use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Output a result in the appropriate format.
///
/// Text mode prints only `text` so the output can be piped; JSON mode merges
/// `data` into a `{"success": true, "message": ...}` object.
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    text: &str,
    data: Map<String, Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&success_body(message, data))?);
        }
        OutputFormat::Text => {
            println!("{}", text);
        }
    }
    Ok(())
}

fn success_body(message: &str, data: Map<String, Value>) -> Value {
    let mut response = Map::new();
    response.insert("success".to_string(), json!(true));
    response.insert("message".to_string(), json!(message));
    response.extend(data);
    Value::Object(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_merges_data() {
        let mut data = Map::new();
        data.insert("key".to_string(), json!("abc"));
        let body = success_body("Generated key", data);
        assert_eq!(body, json!({"success": true, "message": "Generated key", "key": "abc"}));
    }
}
