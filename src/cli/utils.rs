use std::io::Read;

use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::client::Params;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            eprintln!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Parse repeated `key=value` arguments into query params
pub fn parse_params(pairs: &[String]) -> anyhow::Result<Params> {
    let mut params = Params::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected key=value, got '{}'", pair))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Empty parameter name in '{}'", pair);
        }
        params.insert(key.to_string(), value.trim().to_string());
    }
    Ok(params)
}

/// JSON body from `--data`, or from stdin when `--data -` or absent
pub fn read_json_input(data: Option<&str>) -> anyhow::Result<Value> {
    let raw = match data {
        Some(text) if text != "-" => text.to_string(),
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if raw.trim().is_empty() {
        anyhow::bail!("No JSON input given (use --data or pipe it on stdin)");
    }
    serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("Invalid JSON input: {}", e))
}

/// Primary keys travel as numbers when they look like numbers
pub fn pk_value(pk: &str) -> Value {
    match pk.parse::<i64>() {
        Ok(n) => json!(n),
        Err(_) => json!(pk),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_key_value_pairs() {
        let params = parse_params(&["page=2".to_string(), "school = 3".to_string()]).unwrap();
        assert_eq!(params["page"], "2");
        assert_eq!(params["school"], "3");
        assert!(parse_params(&["nonsense".to_string()]).is_err());
        assert!(parse_params(&["=1".to_string()]).is_err());
    }

    #[test]
    fn inline_json_is_parsed() {
        let value = read_json_input(Some(r#"{"name": "한빛초등학교"}"#)).unwrap();
        assert_eq!(value["name"], "한빛초등학교");
        assert!(read_json_input(Some("{broken")).is_err());
    }

    #[test]
    fn numeric_pks_become_numbers() {
        assert_eq!(pk_value("12"), json!(12));
        assert_eq!(pk_value("s-12"), json!("s-12"));
    }
}
