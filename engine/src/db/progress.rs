/// Progress log persistence operations
///
/// Progress entries are an append-only, timestamped log attached to a goal.
/// The entry type is caller-supplied free text; by convention one of
/// progress, obstacle, achievement, or reflection.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::goals::Result;
use super::now_timestamp;

/// Default number of entries returned by `get_progress_logs`.
const DEFAULT_LOG_LIMIT: i64 = 10;

/// Progress log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: String,
    pub goal_id: String,
    pub entry_type: String,
    pub content: String,
    pub metadata: Value,
    pub timestamp: String,
}

/// Progress log repository for database operations
pub struct ProgressStore {
    pool: SqlitePool,
}

impl ProgressStore {
    /// Create a new progress store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a progress entry for a goal and return its generated id.
    ///
    /// Like milestones, the goal id is not checked for existence.
    pub async fn log_progress(
        &self,
        goal_id: &str,
        entry_type: &str,
        content: &str,
        metadata: Option<Value>,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = now_timestamp();
        let metadata = metadata
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
            .to_string();

        sqlx::query(
            "INSERT INTO progress_logs (id, goal_id, entry_type, content, metadata, timestamp) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(goal_id)
        .bind(entry_type)
        .bind(content)
        .bind(&metadata)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Get recent progress entries for a goal, newest first.
    pub async fn get_progress_logs(
        &self,
        goal_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ProgressEntry>> {
        // SQLite treats a non-positive LIMIT as unlimited, so those fall
        // back to the default cap instead.
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LOG_LIMIT);

        let rows = sqlx::query(
            "SELECT id, goal_id, entry_type, content, metadata, timestamp \
             FROM progress_logs WHERE goal_id = ? \
             ORDER BY timestamp DESC, rowid DESC LIMIT ?",
        )
        .bind(goal_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ProgressEntry {
                id: r.get("id"),
                goal_id: r.get("goal_id"),
                entry_type: r.get("entry_type"),
                content: r.get("content"),
                metadata: serde_json::from_str(&r.get::<String, _>("metadata"))
                    .unwrap_or_else(|_| Value::Object(serde_json::Map::new())),
                timestamp: r.get("timestamp"),
            })
            .collect())
    }
}
