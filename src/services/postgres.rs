use crate::core::ModelFilter;
use crate::models::{
    CreateModelRequest, DashboardStats, ModelRecord, ModelUpdate, PurchaseRecord,
    RegisterUserRequest, UserRecord,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already purchased by {0}")]
    AlreadyPurchased(String),
}

/// PostgreSQL client backing the three collections: models, users, purchases
///
/// Created once at startup and injected into every handler through the
/// application state; handlers never reach for a global connection.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    // --- Models ---

    /// List models matching the filter, newest first.
    ///
    /// An empty filter matches everything. The search term matches name OR
    /// framework OR dataset as a case-insensitive substring; the framework
    /// list is a case-insensitive exact match; both combine with AND.
    pub async fn list_models(&self, filter: &ModelFilter) -> Result<Vec<ModelRecord>, StoreError> {
        let query = r#"
            SELECT id, name, framework, dataset, description, created_by,
                   created_at, updated_at, purchased_by, purchased
            FROM models
            WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR framework ILIKE $1 OR dataset ILIKE $1)
              AND (cardinality($2::TEXT[]) = 0 OR LOWER(framework) = ANY($2))
            ORDER BY created_at DESC
        "#;

        let models = sqlx::query_as::<_, ModelRecord>(query)
            .bind(filter.like_pattern())
            .bind(&filter.frameworks)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Listed {} models (filter: {:?})", models.len(), filter);

        Ok(models)
    }

    /// Case-insensitive substring search on the name field only
    pub async fn search_models_by_name(
        &self,
        pattern: Option<String>,
    ) -> Result<Vec<ModelRecord>, StoreError> {
        let query = r#"
            SELECT id, name, framework, dataset, description, created_by,
                   created_at, updated_at, purchased_by, purchased
            FROM models
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
            ORDER BY created_at DESC
        "#;

        sqlx::query_as::<_, ModelRecord>(query)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    /// The 6 most recently created models, newest first
    pub async fn recent_models(&self) -> Result<Vec<ModelRecord>, StoreError> {
        let query = r#"
            SELECT id, name, framework, dataset, description, created_by,
                   created_at, updated_at, purchased_by, purchased
            FROM models
            ORDER BY created_at DESC
            LIMIT 6
        "#;

        sqlx::query_as::<_, ModelRecord>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    /// Fetch a model by id
    pub async fn get_model(&self, id: Uuid) -> Result<ModelRecord, StoreError> {
        let query = r#"
            SELECT id, name, framework, dataset, description, created_by,
                   created_at, updated_at, purchased_by, purchased
            FROM models
            WHERE id = $1
        "#;

        sqlx::query_as::<_, ModelRecord>(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("model {}", id)))
    }

    /// Insert a model; the owner is the verified caller, the purchaser list
    /// starts empty.
    pub async fn insert_model(
        &self,
        request: &CreateModelRequest,
        owner: &str,
    ) -> Result<ModelRecord, StoreError> {
        let query = r#"
            INSERT INTO models (name, framework, dataset, description, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, framework, dataset, description, created_by,
                      created_at, updated_at, purchased_by, purchased
        "#;

        let model = sqlx::query_as::<_, ModelRecord>(query)
            .bind(&request.name)
            .bind(&request.framework)
            .bind(&request.dataset)
            .bind(&request.description)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created model {} for {}", model.id, owner);

        Ok(model)
    }

    /// Apply a sanitized partial update and stamp updated_at.
    ///
    /// Ownership is checked by the caller before this runs; this method only
    /// applies fields that survived sanitization.
    pub async fn update_model(
        &self,
        id: Uuid,
        update: &ModelUpdate,
    ) -> Result<ModelRecord, StoreError> {
        let query = r#"
            UPDATE models
            SET name = COALESCE($2, name),
                framework = COALESCE($3, framework),
                dataset = COALESCE($4, dataset),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, framework, dataset, description, created_by,
                      created_at, updated_at, purchased_by, purchased
        "#;

        sqlx::query_as::<_, ModelRecord>(query)
            .bind(id)
            .bind(&update.name)
            .bind(&update.framework)
            .bind(&update.dataset)
            .bind(&update.description)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("model {}", id)))
    }

    /// Delete a model by id
    pub async fn delete_model(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM models WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("model {}", id)));
        }

        tracing::info!("Deleted model {}", id);

        Ok(())
    }

    /// Models owned by the given verified email, newest first
    pub async fn models_by_owner(&self, email: &str) -> Result<Vec<ModelRecord>, StoreError> {
        let query = r#"
            SELECT id, name, framework, dataset, description, created_by,
                   created_at, updated_at, purchased_by, purchased
            FROM models
            WHERE created_by = $1
            ORDER BY created_at DESC
        "#;

        sqlx::query_as::<_, ModelRecord>(query)
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    // --- Purchases ---

    /// Execute the purchase transition for (model, email) in one transaction.
    ///
    /// The append is conditional on the email not already being in the
    /// purchaser list, so the duplicate guard holds under concurrent attempts;
    /// the counter increment and the denormalized ledger insert commit with it
    /// or not at all.
    pub async fn purchase_model(
        &self,
        model_id: Uuid,
        email: &str,
    ) -> Result<(PurchaseRecord, i64), StoreError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<(String, String, i64)> = sqlx::query_as(
            r#"
            UPDATE models
            SET purchased_by = array_append(purchased_by, $2),
                purchased = purchased + 1
            WHERE id = $1 AND NOT ($2 = ANY(purchased_by))
            RETURNING name, framework, purchased
            "#,
        )
        .bind(model_id)
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((name, framework, purchased)) = updated else {
            // No row updated: either the model is absent or the email is
            // already in the purchaser list.
            let exists: Option<bool> =
                sqlx::query_scalar("SELECT $2 = ANY(purchased_by) FROM models WHERE id = $1")
                    .bind(model_id)
                    .bind(email)
                    .fetch_optional(&mut *tx)
                    .await?;

            return match exists {
                None => Err(StoreError::NotFound(format!("model {}", model_id))),
                Some(_) => Err(StoreError::AlreadyPurchased(email.to_string())),
            };
        };

        let purchase: PurchaseRecord = sqlx::query_as(
            r#"
            INSERT INTO purchases (model_id, downloaded_by, model_name, framework)
            VALUES ($1, $2, $3, $4)
            RETURNING id, model_id, downloaded_by, model_name, framework, purchased_at
            "#,
        )
        .bind(model_id)
        .bind(email)
        .bind(&name)
        .bind(&framework)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Recorded purchase of {} by {}", model_id, email);

        Ok((purchase, purchased))
    }

    /// Purchase-ledger entries for the given verified email, newest first
    pub async fn purchases_by_email(&self, email: &str) -> Result<Vec<PurchaseRecord>, StoreError> {
        let query = r#"
            SELECT id, model_id, downloaded_by, model_name, framework, purchased_at
            FROM purchases
            WHERE downloaded_by = $1
            ORDER BY purchased_at DESC
        "#;

        sqlx::query_as::<_, PurchaseRecord>(query)
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    // --- Users ---

    /// Idempotent registration keyed by email.
    ///
    /// Uses INSERT ... ON CONFLICT DO NOTHING; returns false when the email
    /// was already registered, leaving the stored record untouched.
    pub async fn register_user(&self, request: &RegisterUserRequest) -> Result<bool, StoreError> {
        let query = r#"
            INSERT INTO users (email, display_name, photo_url, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(&request.email)
            .bind(&request.display_name)
            .bind(&request.photo_url)
            .bind(&request.role)
            .execute(&self.pool)
            .await?;

        let inserted = result.rows_affected() > 0;

        tracing::debug!(
            "Registration for {}: {}",
            request.email,
            if inserted { "inserted" } else { "already exists" }
        );

        Ok(inserted)
    }

    /// Fetch a user by email
    pub async fn get_user(&self, email: &str) -> Result<UserRecord, StoreError> {
        let query = r#"
            SELECT email, display_name, photo_url, role, created_at
            FROM users
            WHERE email = $1
        "#;

        sqlx::query_as::<_, UserRecord>(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", email)))
    }

    // --- Aggregates ---

    /// Marketplace-wide counts, recomputed from current contents on every call
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, StoreError> {
        let query = r#"
            SELECT
                (SELECT COUNT(*) FROM models)::BIGINT AS total_models,
                (SELECT COUNT(*) FROM users)::BIGINT AS total_users,
                (SELECT COALESCE(SUM(cardinality(purchased_by)), 0) FROM models)::BIGINT AS total_downloads
        "#;

        let (total_models, total_users, total_downloads): (i64, i64, i64) =
            sqlx::query_as(query).fetch_one(&self.pool).await?;

        Ok(DashboardStats {
            total_models,
            total_users,
            total_downloads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_messages() {
        let err = StoreError::NotFound("model abc".to_string());
        assert_eq!(err.to_string(), "Not found: model abc");

        let err = StoreError::AlreadyPurchased("e1@x.com".to_string());
        assert_eq!(err.to_string(), "Already purchased by e1@x.com");
    }
}
