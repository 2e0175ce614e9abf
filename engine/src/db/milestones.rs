/// Milestone persistence operations
///
/// Milestones belong to exactly one goal by reference id. There is no goal
/// existence check on insert and no update or delete operation; milestones
/// are created, listed, and otherwise left alone.
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::goals::Result;
use super::now_timestamp;

/// Milestone record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
    pub priority: i64,
    pub completed: bool,
    pub completed_date: Option<String>,
    pub created_date: String,
}

/// Fields for creating a milestone.
#[derive(Debug, Clone)]
pub struct NewMilestone {
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
    pub priority: i64,
}

impl NewMilestone {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority: 3,
        }
    }
}

/// Milestone repository for database operations
pub struct MilestoneStore {
    pool: SqlitePool,
}

impl MilestoneStore {
    /// Create a new milestone store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a milestone to a goal and return its generated id.
    ///
    /// The goal id is taken on trust; a milestone for a non-existent goal
    /// is accepted.
    pub async fn add_milestone(&self, goal_id: &str, milestone: NewMilestone) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = now_timestamp();

        sqlx::query(
            "INSERT INTO milestones \
             (id, goal_id, title, description, due_date, priority, completed, completed_date, created_date) \
             VALUES (?, ?, ?, ?, ?, ?, 0, NULL, ?)",
        )
        .bind(&id)
        .bind(goal_id)
        .bind(&milestone.title)
        .bind(&milestone.description)
        .bind(&milestone.due_date)
        .bind(milestone.priority)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Get all milestones for a goal in creation order.
    pub async fn get_milestones(&self, goal_id: &str) -> Result<Vec<Milestone>> {
        let rows = sqlx::query(
            "SELECT id, goal_id, title, description, due_date, priority, completed, \
             completed_date, created_date \
             FROM milestones WHERE goal_id = ? ORDER BY created_date ASC, rowid ASC",
        )
        .bind(goal_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Milestone {
                id: r.get("id"),
                goal_id: r.get("goal_id"),
                title: r.get("title"),
                description: r.get("description"),
                due_date: r.get("due_date"),
                priority: r.get("priority"),
                completed: r.get::<i64, _>("completed") != 0,
                completed_date: r.get("completed_date"),
                created_date: r.get("created_date"),
            })
            .collect())
    }
}
