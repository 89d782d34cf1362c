use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a model listing
///
/// The owner is always the verified caller identity; the body cannot set it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateModelRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub framework: String,
    #[validate(length(min = 1, max = 200))]
    pub dataset: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// The updatable model fields that remain after sanitization.
///
/// Protected fields (id, owner, purchaser list, counter, timestamps) are
/// stripped before this type is deserialized, so they are not representable
/// here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ModelUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub framework: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub dataset: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl ModelUpdate {
    /// True when the payload carried no updatable field
    pub fn is_noop(&self) -> bool {
        self.name.is_none()
            && self.framework.is_none()
            && self.dataset.is_none()
            && self.description.is_none()
    }
}

/// Request to register a user
///
/// Registration is idempotent per email: re-registering returns a sentinel
/// response, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    #[serde(alias = "display_name", rename = "displayName")]
    pub display_name: String,
    #[serde(alias = "photo_url", rename = "photoUrl", default)]
    pub photo_url: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_string()
}

/// Query parameters for GET /findmodels
#[derive(Debug, Clone, Deserialize)]
pub struct FindModelsQuery {
    #[serde(default)]
    pub search: Option<String>,
    /// Comma-separated framework labels, e.g. ?framework=TensorFlow,PyTorch
    #[serde(default)]
    pub framework: Option<String>,
}

/// Query parameters for GET /search (name-only substring match)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}
