use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{DisputeReport, DisputeStatus};
use crate::utils::errors::AppError;

/// Persistencia que necesita la resolución de disputas
#[async_trait]
pub trait DisputeStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DisputeReport>, AppError>;

    /// Marcar como resuelta solo si sigue en `pending` o `under_review`.
    ///
    /// `None` cuando la disputa ya no está abierta (o no existe).
    async fn resolve(
        &self,
        id: Uuid,
        resolution: &str,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<DisputeReport>, AppError>;
}

/// Filtros de listado de disputas
#[derive(Debug, Clone, Default)]
pub struct DisputeQuery {
    /// Solo disputas sobre reservas de este usuario
    pub booking_owner: Option<Uuid>,
    pub booking_id: Option<Uuid>,
    pub status: Option<DisputeStatus>,
}

pub struct DisputeRepository {
    pool: PgPool,
}

impl DisputeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        booking_id: Uuid,
        reason: &str,
        description: &str,
        photo_urls: &[String],
    ) -> Result<DisputeReport, AppError> {
        let dispute = sqlx::query_as::<_, DisputeReport>(
            r#"
            INSERT INTO dispute_reports (id, booking_id, reason, description, photo_urls, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(reason)
        .bind(description)
        .bind(photo_urls)
        .bind(DisputeStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(dispute)
    }

    pub async fn list(&self, query: &DisputeQuery) -> Result<Vec<DisputeReport>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT d.* FROM dispute_reports d JOIN booking_sessions b ON b.id = d.booking_id WHERE TRUE",
        );

        if let Some(owner) = query.booking_owner {
            builder.push(" AND b.user_id = ").push_bind(owner);
        }

        if let Some(booking_id) = query.booking_id {
            builder.push(" AND d.booking_id = ").push_bind(booking_id);
        }

        if let Some(status) = query.status {
            builder.push(" AND d.status = ").push_bind(status);
        }

        builder.push(" ORDER BY d.created_at DESC");

        let disputes = builder
            .build_query_as::<DisputeReport>()
            .fetch_all(&self.pool)
            .await?;

        Ok(disputes)
    }
}

#[async_trait]
impl DisputeStore for DisputeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DisputeReport>, AppError> {
        let dispute = sqlx::query_as::<_, DisputeReport>("SELECT * FROM dispute_reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(dispute)
    }

    async fn resolve(
        &self,
        id: Uuid,
        resolution: &str,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<DisputeReport>, AppError> {
        let dispute = sqlx::query_as::<_, DisputeReport>(
            r#"
            UPDATE dispute_reports
            SET status = 'resolved', resolution = $2, resolved_at = $3
            WHERE id = $1 AND status IN ('pending', 'under_review')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(resolution)
        .bind(resolved_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(dispute)
    }
}
