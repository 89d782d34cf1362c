use crate::models::domain::{ModelRecord, PurchaseRecord, UserRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Response for idempotent user registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub inserted: bool,
    pub message: String,
    pub email: String,
}

/// Response for a completed purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub purchase: PurchaseRecord,
    pub downloads: usize,
}

/// Public profile projection for GET /profile/{email}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "photoUrl")]
    pub photo_url: Option<String>,
    pub role: String,
}

impl From<UserRecord> for ProfileResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            email: user.email,
            display_name: user.display_name,
            photo_url: user.photo_url,
            role: user.role,
        }
    }
}

/// Dashboard projection of a model: fixed field allow-list plus the download
/// count derived from the purchaser list at response-construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardModel {
    pub name: String,
    pub framework: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "purchasedBy")]
    pub purchased_by: Vec<String>,
    pub downloads: usize,
}

impl From<ModelRecord> for DashboardModel {
    fn from(model: ModelRecord) -> Self {
        let downloads = model.downloads();
        Self {
            name: model.name,
            framework: model.framework,
            created_at: model.created_at,
            purchased_by: model.purchased_by,
            downloads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_dashboard_projection_derives_downloads() {
        let model = ModelRecord {
            id: Uuid::new_v4(),
            name: "yolo-v8".to_string(),
            framework: "PyTorch".to_string(),
            dataset: "COCO".to_string(),
            description: Some("detector".to_string()),
            created_by: "owner@example.com".to_string(),
            created_at: Utc::now(),
            updated_at: None,
            purchased_by: vec!["a@x.com".to_string(), "b@x.com".to_string(), "c@x.com".to_string()],
            purchased: 3,
        };

        let projected = DashboardModel::from(model);
        assert_eq!(projected.downloads, 3);

        // Owner and description are excluded from the projection
        let json = serde_json::to_value(&projected).unwrap();
        assert!(json.get("createdBy").is_none());
        assert!(json.get("description").is_none());
        assert!(json.get("purchasedBy").is_some());
    }
}
