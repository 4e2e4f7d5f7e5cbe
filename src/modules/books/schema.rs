//! JSON Schema validation for book payloads.
//!
//! The same full schema guards create and update since PUT replaces the whole
//! record. Validation is pure: it neither logs nor touches the store.

use std::fmt;

use jsonschema::{Draft, Validator};
use serde_json::{json, Value};

use super::models::Book;

/// Which write the payload is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => f.write_str("create"),
            Operation::Update => f.write_str("update"),
        }
    }
}

/// A payload rejected by the schema. `messages` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid book payload for {operation}: {}", .messages.join("; "))]
pub struct ValidationErrors {
    pub operation: Operation,
    pub messages: Vec<String>,
}

/// The fixed book schema: every field required, no extras.
pub fn book_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "Book",
        "type": "object",
        "properties": {
            "isbn": { "type": "string", "minLength": 1 },
            "amazon_url": { "type": "string" },
            "author": { "type": "string" },
            "language": { "type": "string" },
            "pages": { "type": "integer", "minimum": 1 },
            "publisher": { "type": "string" },
            "title": { "type": "string" },
            "year": { "type": "integer" }
        },
        "required": [
            "isbn",
            "amazon_url",
            "author",
            "language",
            "pages",
            "publisher",
            "title",
            "year"
        ],
        "additionalProperties": false
    })
}

/// Compiled book schema
pub struct BookValidator {
    validator: Validator,
}

impl BookValidator {
    pub fn new() -> anyhow::Result<Self> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&book_schema())
            .map_err(|err| anyhow::anyhow!("book schema does not compile: {err}"))?;
        Ok(Self { validator })
    }

    /// Check `payload` and, when it passes, turn it into a [`Book`].
    pub fn validate(&self, operation: Operation, payload: Value) -> Result<Book, ValidationErrors> {
        let messages: Vec<String> = self
            .validator
            .iter_errors(&payload)
            .map(|err| err.to_string())
            .collect();

        if !messages.is_empty() {
            return Err(ValidationErrors {
                operation,
                messages,
            });
        }

        // Schema-valid integers such as 250.0 or 2^70 still fail here.
        serde_json::from_value(payload).map_err(|err| ValidationErrors {
            operation,
            messages: vec![err.to_string()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> Value {
        json!({
            "isbn": "12345678",
            "amazon_url": "https://amazon.com",
            "author": "Test Author",
            "language": "english",
            "pages": 250,
            "publisher": "Test Publisher",
            "title": "Testing 1 2 3",
            "year": 2004
        })
    }

    fn messages_for(payload: Value) -> Vec<String> {
        BookValidator::new()
            .unwrap()
            .validate(Operation::Create, payload)
            .unwrap_err()
            .messages
    }

    #[test]
    fn accepts_complete_payload() {
        let book = BookValidator::new()
            .unwrap()
            .validate(Operation::Update, valid_payload())
            .unwrap();
        assert_eq!(book.isbn, "12345678");
        assert_eq!(book.pages, 250);
        assert_eq!(book.year, 2004);
    }

    #[test]
    fn rejects_unknown_field() {
        let mut payload = valid_payload();
        payload["field_does_not_exist"] = json!("Cause Error");

        let messages = messages_for(payload);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("field_does_not_exist"));
    }

    #[test]
    fn reports_every_missing_field() {
        let messages = messages_for(json!({ "isbn": "1" }));
        assert_eq!(messages.len(), 7);
        assert!(messages.iter().any(|m| m.contains("\"amazon_url\"")));
        assert!(messages.iter().any(|m| m.contains("\"year\"")));
    }

    #[test]
    fn rejects_wrong_types() {
        let mut payload = valid_payload();
        payload["pages"] = json!("250");
        payload["title"] = json!(42);

        let messages = messages_for(payload);
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.contains("\"250\"")));
    }

    #[test]
    fn pages_must_be_positive() {
        let mut payload = valid_payload();
        payload["pages"] = json!(0);
        assert_eq!(messages_for(payload).len(), 1);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(!messages_for(json!([1, 2, 3])).is_empty());
        assert!(!messages_for(Value::Null).is_empty());
    }

    #[test]
    fn fractional_integer_is_caught_after_schema() {
        let mut payload = valid_payload();
        payload["pages"] = json!(250.0);

        let err = BookValidator::new()
            .unwrap()
            .validate(Operation::Create, payload)
            .unwrap_err();
        assert_eq!(err.messages.len(), 1);
        assert!(err.to_string().starts_with("invalid book payload for create"));
    }
}
