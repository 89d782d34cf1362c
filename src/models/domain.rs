use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A machine-learning model listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModelRecord {
    pub id: Uuid,
    pub name: String,
    pub framework: String,
    pub dataset: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Owner email, authoritative for update/delete authorization
    #[serde(rename = "createdBy")]
    pub created_by: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Purchaser emails; each email appears at most once
    #[serde(rename = "purchasedBy", default)]
    pub purchased_by: Vec<String>,
    /// Purchase counter, maintained alongside the purchaser list
    #[serde(default)]
    pub purchased: i64,
}

impl ModelRecord {
    /// Derived download count
    pub fn downloads(&self) -> usize {
        self.purchased_by.len()
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.created_by == email
    }
}

/// A registered marketplace user, keyed by email
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
    pub role: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A purchase-ledger entry with denormalized model details
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PurchaseRecord {
    pub id: Uuid,
    #[serde(rename = "modelId")]
    pub model_id: Uuid,
    #[serde(rename = "downloadedBy")]
    pub downloaded_by: String,
    #[serde(rename = "modelName")]
    pub model_name: String,
    pub framework: String,
    #[serde(rename = "purchasedAt")]
    pub purchased_at: DateTime<Utc>,
}

/// Marketplace-wide aggregate counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "totalModels")]
    pub total_models: i64,
    #[serde(rename = "totalUsers")]
    pub total_users: i64,
    #[serde(rename = "totalDownloads")]
    pub total_downloads: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downloads_derived_from_list() {
        let model = ModelRecord {
            id: Uuid::new_v4(),
            name: "resnet-50".to_string(),
            framework: "PyTorch".to_string(),
            dataset: "ImageNet".to_string(),
            description: None,
            created_by: "owner@example.com".to_string(),
            created_at: Utc::now(),
            updated_at: None,
            purchased_by: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            purchased: 2,
        };

        assert_eq!(model.downloads(), 2);
        assert!(model.is_owned_by("owner@example.com"));
        assert!(!model.is_owned_by("a@x.com"));
    }

    #[test]
    fn test_model_wire_field_names() {
        let json = serde_json::json!({
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "name": "bert-base",
            "framework": "TensorFlow",
            "dataset": "SQuAD",
            "createdBy": "owner@example.com",
            "createdAt": "2026-01-01T00:00:00Z"
        });

        let model: ModelRecord = serde_json::from_value(json).unwrap();
        assert_eq!(model.created_by, "owner@example.com");
        assert!(model.purchased_by.is_empty());
        assert_eq!(model.purchased, 0);
    }
}
