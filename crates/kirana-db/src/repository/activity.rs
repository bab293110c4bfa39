//! # Activity Log Repository
//!
//! Write-once, read-many audit trail. Rows are appended after the fact
//! by the [`ActivityRecorder`](crate::events::ActivityRecorder) or
//! directly by admin operations; nothing updates or deletes them.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kirana_core::ActivityLog;

const ACTIVITY_COLUMNS: &str = "id, user_id, action, details, ip_address, created_at";

/// Repository for activity log operations.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: SqlitePool,
}

impl ActivityLogRepository {
    /// Creates a new ActivityLogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ActivityLogRepository { pool }
    }

    /// Inserts a prepared activity log entry.
    pub async fn insert(&self, log: &ActivityLog) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO activity_logs (id, user_id, action, details, ip_address, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&log.id)
        .bind(&log.user_id)
        .bind(&log.action)
        .bind(&log.details)
        .bind(&log.ip_address)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Convenience append: builds the entry and inserts it.
    pub async fn log(
        &self,
        user_id: &str,
        action: &str,
        details: Option<String>,
        ip_address: Option<String>,
    ) -> DbResult<ActivityLog> {
        let entry = ActivityLog {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            action: action.to_string(),
            details,
            ip_address,
            created_at: Utc::now(),
        };

        debug!(user_id = %entry.user_id, action = %entry.action, "Recording activity");
        self.insert(&entry).await?;

        Ok(entry)
    }

    /// Most recent entries, newest first.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<ActivityLog>> {
        let logs = sqlx::query_as::<_, ActivityLog>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
