//! Kafka-specific attribute types

use std::sync::LazyLock;

use regex::Regex;
use rhoas_core::resource::Value;
use rhoas_core::schema::AttributeType;

/// Longest name the management API accepts
pub const MAX_NAME_LENGTH: usize = 32;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]([-a-z0-9]*[a-z0-9])?$").expect("valid name pattern"));

/// Check an instance name: lowercase letters, digits and hyphens, starting
/// with a letter and not ending with a hyphen
pub fn validate_kafka_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name must not be empty".to_string());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(format!(
            "name '{}' is longer than {} characters",
            name, MAX_NAME_LENGTH
        ));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(format!(
            "name '{}' must start with a lowercase letter and contain only lowercase letters, digits and '-'",
            name
        ));
    }
    Ok(())
}

/// Kafka instance name type
pub fn kafka_name() -> AttributeType {
    AttributeType::Custom {
        name: "KafkaName".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| match value {
            Value::String(s) => validate_kafka_name(s),
            _ => Err("Expected string".to_string()),
        },
    }
}

/// List of ACL bindings, each a map of string fields
pub fn acl_list() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::Map(Box::new(AttributeType::String))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_names() {
        for name in ["a", "my-kafka", "kafka01", "k-1-2"] {
            assert!(validate_kafka_name(name).is_ok(), "{} rejected", name);
        }
    }

    #[test]
    fn rejects_invalid_names() {
        for name in ["", "My-Kafka", "1kafka", "kafka-", "kafka_1", "a.b"] {
            assert!(validate_kafka_name(name).is_err(), "{} accepted", name);
        }
        let long = "k".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_kafka_name(&long).is_err());
    }

    #[test]
    fn kafka_name_type_checks_value() {
        let t = kafka_name();
        assert!(t.validate(&Value::String("events".to_string())).is_ok());
        assert!(t.validate(&Value::String(String::new())).is_err());
        assert!(t.validate(&Value::Int(1)).is_err());
    }
}
