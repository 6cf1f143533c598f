//! Config redaction: produce safe-to-share config snapshots by masking secrets.

use serde_json::Value;

use crate::schema::TutorConfig;

/// Keys whose string values are always masked.
static SENSITIVE_KEYS: &[&str] = &["apiKey", "api_key", "token", "secret", "password"];

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Mask a secret, keeping a short prefix as a hint (`sk-a***`).
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() > 8 {
        format!("{}***", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

/// Redact a JSON value tree, masking every sensitive field.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) if is_sensitive_key(k) && !s.is_empty() => {
                            Value::String(mask_secret(s))
                        }
                        other => redact(other),
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(redact).collect()),
        other => other.clone(),
    }
}

/// Serialize a config with all secrets masked.
pub fn redacted_config(config: &TutorConfig) -> Value {
    // TutorConfig only holds strings and numbers, so this cannot fail.
    let value = serde_json::to_value(config).unwrap_or(Value::Null);
    redact(&value)
}
