use crate::models::ModelUpdate;
use serde_json::{Map, Value};
use validator::Validate;

/// Fields a PATCH payload may never change. Both wire (camelCase) and
/// storage (snake_case) spellings are rejected.
const PROTECTED_UPDATE_FIELDS: &[&str] = &[
    "id",
    "_id",
    "createdBy",
    "created_by",
    "purchasedBy",
    "purchased_by",
    "purchased",
    "createdAt",
    "created_at",
    "updatedAt",
    "updated_at",
];

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// Returns `None` for a missing scheme, a non-bearer scheme, or an empty
/// token.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Errors from PATCH payload sanitization
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    #[error("invalid update payload: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("update validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Reduce a raw PATCH payload to the updatable model fields.
///
/// Allow-by-exclusion: protected fields are stripped, the remainder is
/// deserialized into the typed update and validated. A payload that tries to
/// change the owner, the purchaser list, or the identifier simply has those
/// keys ignored.
pub fn sanitize_update(mut payload: Map<String, Value>) -> Result<ModelUpdate, SanitizeError> {
    for field in PROTECTED_UPDATE_FIELDS {
        payload.remove(*field);
    }

    let update: ModelUpdate = serde_json::from_value(Value::Object(payload))?;
    update.validate()?;

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_parse_bearer_ok() {
        assert_eq!(parse_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("bearer abc123"), Some("abc123"));
        assert_eq!(parse_bearer("  Bearer   abc123  "), Some("abc123"));
    }

    #[test]
    fn test_parse_bearer_rejects_bad_input() {
        assert_eq!(parse_bearer(""), None);
        assert_eq!(parse_bearer("abc123"), None);
        assert_eq!(parse_bearer("Basic abc123"), None);
        assert_eq!(parse_bearer("Bearer "), None);
    }

    #[test]
    fn test_sanitize_strips_protected_fields() {
        let payload = as_map(json!({
            "name": "renamed",
            "createdBy": "attacker@x.com",
            "purchasedBy": ["attacker@x.com"],
            "purchased": 9999,
            "id": "11111111-1111-1111-1111-111111111111",
            "_id": "anything",
            "createdAt": "2020-01-01T00:00:00Z"
        }));

        let update = sanitize_update(payload).unwrap();
        assert_eq!(update.name.as_deref(), Some("renamed"));
        assert!(update.framework.is_none());
    }

    #[test]
    fn test_sanitize_keeps_updatable_fields() {
        let payload = as_map(json!({
            "name": "bert-large",
            "framework": "TensorFlow",
            "dataset": "SQuAD",
            "description": "fine-tuned"
        }));

        let update = sanitize_update(payload).unwrap();
        assert_eq!(update.framework.as_deref(), Some("TensorFlow"));
        assert_eq!(update.dataset.as_deref(), Some("SQuAD"));
        assert_eq!(update.description.as_deref(), Some("fine-tuned"));
    }

    #[test]
    fn test_sanitize_only_protected_fields_is_noop() {
        let payload = as_map(json!({
            "createdBy": "attacker@x.com",
            "purchased_by": ["attacker@x.com"]
        }));

        let update = sanitize_update(payload).unwrap();
        assert!(update.is_noop());
    }

    #[test]
    fn test_sanitize_rejects_wrong_types() {
        let payload = as_map(json!({ "name": 42 }));
        assert!(sanitize_update(payload).is_err());
    }

    #[test]
    fn test_sanitize_rejects_empty_name() {
        let payload = as_map(json!({ "name": "" }));
        assert!(matches!(
            sanitize_update(payload),
            Err(SanitizeError::Validation(_))
        ));
    }
}
