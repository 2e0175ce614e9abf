/// Goal persistence operations
///
/// Goals are owned by a free-text user id and carry a clamped 1-5 priority,
/// a lifecycle status, and an open metadata map. Goals are never hard-deleted;
/// archiving or completing a goal is a status transition.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, SqlitePool};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::now_timestamp;

/// Errors returned by the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
    Archived,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Paused => "paused",
            GoalStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            "paused" => Ok(GoalStatus::Paused),
            "archived" => Ok(GoalStatus::Archived),
            other => Err(StoreError::Validation(format!(
                "Unknown goal status '{}'",
                other
            ))),
        }
    }
}

/// Goal record as returned by reads.
///
/// `milestone_count` is derived on read and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: i64,
    pub status: GoalStatus,
    pub target_date: Option<String>,
    pub progress_percentage: i64,
    pub metadata: Value,
    pub created_date: String,
    pub updated_date: String,
    pub milestone_count: i64,
}

/// Fields for creating a goal. Missing optional fields take their defaults.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: i64,
    pub target_date: Option<String>,
    pub metadata: Value,
}

impl Default for NewGoal {
    fn default() -> Self {
        Self {
            user_id: "default".to_string(),
            title: String::new(),
            description: String::new(),
            category: "personal".to_string(),
            priority: 3,
            target_date: None,
            metadata: Value::Object(serde_json::Map::new()),
        }
    }
}

impl NewGoal {
    /// Create a new goal with the given title and defaults for everything else.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a goal. `None` fields are left untouched.
///
/// This is the closed set of updatable fields; callers must drop anything
/// else before reaching the store.
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<GoalStatus>,
    pub priority: Option<i64>,
    pub target_date: Option<String>,
    pub progress_percentage: Option<i64>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.target_date.is_none()
            && self.progress_percentage.is_none()
    }
}

/// Per-status aggregate for a user's goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusStat {
    pub status: String,
    pub count: i64,
    pub avg_priority: f64,
}

/// Per-category aggregate over a user's active goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub count: i64,
}

/// Aggregate analytics over one user's goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalAnalytics {
    pub status_breakdown: Vec<StatusStat>,
    pub category_breakdown: Vec<CategoryStat>,
    pub total_goals: i64,
    pub active_goals: i64,
}

/// Clamp a goal priority into the 1-5 range.
///
/// Out-of-range priorities are clamped rather than rejected at every goal
/// write path.
fn clamp_priority(priority: i64) -> i64 {
    priority.clamp(1, 5)
}

/// Goal repository for database operations
pub struct GoalStore {
    pool: SqlitePool,
}

impl GoalStore {
    /// Create a new goal store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new goal and return its generated id.
    ///
    /// Assigns defaults (status active, progress 0, timestamps now) and
    /// clamps priority. Fails only when the title is empty.
    pub async fn create_goal(&self, goal: NewGoal) -> Result<String> {
        if goal.title.trim().is_empty() {
            return Err(StoreError::Validation(
                "Goal title must not be empty".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let now = now_timestamp();
        let metadata = goal.metadata.to_string();

        sqlx::query(
            "INSERT INTO goals \
             (id, user_id, title, description, category, priority, status, target_date, \
              progress_percentage, metadata, created_date, updated_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&goal.user_id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(&goal.category)
        .bind(clamp_priority(goal.priority))
        .bind(GoalStatus::Active.as_str())
        .bind(&goal.target_date)
        .bind(&metadata)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Retrieve goals for a user, filtered by status.
    ///
    /// A status of `"all"` disables the status filter. Results are sorted by
    /// priority (desc) then creation time (desc), and each goal is annotated
    /// with its milestone count.
    pub async fn get_goals(
        &self,
        user_id: &str,
        status: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Goal>> {
        let mut qb = QueryBuilder::new(
            "SELECT g.*, \
             (SELECT COUNT(*) FROM milestones m WHERE m.goal_id = g.id) AS milestone_count \
             FROM goals g WHERE g.user_id = ",
        );
        qb.push_bind(user_id);
        if status != "all" {
            qb.push(" AND g.status = ");
            qb.push_bind(status);
        }
        qb.push(" ORDER BY g.priority DESC, g.created_date DESC");
        // A non-positive LIMIT means unlimited to SQLite; treat it as absent.
        if let Some(limit) = limit.filter(|l| *l > 0) {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
        }

        let rows = qb.build().fetch_all(&self.pool).await?;

        Ok(rows.iter().map(map_goal_row).collect())
    }

    /// Get a specific goal by id.
    ///
    /// A malformed or absent id is a miss, never an error.
    pub async fn get_goal_by_id(&self, goal_id: &str) -> Result<Option<Goal>> {
        let row = sqlx::query(
            "SELECT g.*, \
             (SELECT COUNT(*) FROM milestones m WHERE m.goal_id = g.id) AS milestone_count \
             FROM goals g WHERE g.id = ?",
        )
        .bind(goal_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_goal_row))
    }

    /// Apply a partial update to a goal, stamping `updated_date`.
    ///
    /// Returns whether any row changed. Updating an absent goal is not an
    /// error; it simply changes nothing.
    pub async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<bool> {
        let mut qb = QueryBuilder::new("UPDATE goals SET updated_date = ");
        qb.push_bind(now_timestamp());

        if let Some(title) = &update.title {
            qb.push(", title = ");
            qb.push_bind(title);
        }
        if let Some(description) = &update.description {
            qb.push(", description = ");
            qb.push_bind(description);
        }
        if let Some(category) = &update.category {
            qb.push(", category = ");
            qb.push_bind(category);
        }
        if let Some(status) = update.status {
            qb.push(", status = ");
            qb.push_bind(status.as_str());
        }
        if let Some(priority) = update.priority {
            qb.push(", priority = ");
            qb.push_bind(clamp_priority(priority));
        }
        if let Some(target_date) = &update.target_date {
            qb.push(", target_date = ");
            qb.push_bind(target_date);
        }
        if let Some(progress) = update.progress_percentage {
            qb.push(", progress_percentage = ");
            qb.push_bind(progress);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(goal_id);

        let result = qb.build().execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate analytics for a user's goals.
    ///
    /// Status breakdown covers all of the user's goals; category breakdown
    /// covers only active ones.
    pub async fn get_goal_analytics(&self, user_id: &str) -> Result<GoalAnalytics> {
        let status_rows = sqlx::query(
            "SELECT status, COUNT(*) AS count, AVG(priority) AS avg_priority \
             FROM goals WHERE user_id = ? GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let status_breakdown = status_rows
            .into_iter()
            .map(|r| StatusStat {
                status: r.get("status"),
                count: r.get("count"),
                avg_priority: r.get("avg_priority"),
            })
            .collect();

        let category_rows = sqlx::query(
            "SELECT category, COUNT(*) AS count \
             FROM goals WHERE user_id = ? AND status = 'active' GROUP BY category",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let category_breakdown = category_rows
            .into_iter()
            .map(|r| CategoryStat {
                category: r.get("category"),
                count: r.get("count"),
            })
            .collect();

        let total_goals: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM goals WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let active_goals: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM goals WHERE user_id = ? AND status = 'active'")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(GoalAnalytics {
            status_breakdown,
            category_breakdown,
            total_goals,
            active_goals,
        })
    }
}

/// Map a database row to a goal record.
fn map_goal_row(r: &SqliteRow) -> Goal {
    Goal {
        id: r.get("id"),
        user_id: r.get("user_id"),
        title: r.get("title"),
        description: r.get("description"),
        category: r.get("category"),
        priority: r.get("priority"),
        // Stored statuses only come from typed writes; fall back to active
        // rather than failing the whole read.
        status: r
            .get::<String, _>("status")
            .parse()
            .unwrap_or(GoalStatus::Active),
        target_date: r.get("target_date"),
        progress_percentage: r.get("progress_percentage"),
        metadata: serde_json::from_str(&r.get::<String, _>("metadata"))
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new())),
        created_date: r.get("created_date"),
        updated_date: r.get("updated_date"),
        milestone_count: r.get("milestone_count"),
    }
}
