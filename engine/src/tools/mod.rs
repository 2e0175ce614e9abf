//! Tool Registry
//!
//! The fixed catalog of operations the model may invoke, plus the dispatch
//! layer that validates and normalizes arguments before calling the store.
//! Handlers are total over their declared schema: every failure becomes a
//! typed `ToolError`, which serializes to a well-formed
//! `{"success": false, ...}` object for the model. The model must always
//! receive a usable tool result; there is no retry path for a malformed one.

pub mod catalog;

pub use catalog::goal_tool_specs;

use crate::db::{
    GoalStatus, GoalStore, GoalUpdate, MilestoneStore, NewGoal, NewMilestone, ProgressStore,
    StoreError,
};
use crate::llm::ToolSpec;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// Errors surfaced by tool dispatch.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ToolError {
    /// Serialize into the uniform failure object sent back to the model.
    ///
    /// Not-found outcomes use a `message` key, everything else an `error`
    /// key; this is part of the tool wire contract.
    pub fn to_result_json(&self) -> Value {
        match self {
            ToolError::NotFound(msg) => json!({"success": false, "message": msg}),
            other => json!({"success": false, "error": other.to_string()}),
        }
    }
}

/// Result type for tool dispatch
pub type ToolResult = std::result::Result<Value, ToolError>;

/// Registry of goal-management tools the agent can dispatch.
pub struct ToolRegistry {
    goals: GoalStore,
    milestones: MilestoneStore,
    progress: ProgressStore,
    specs: Vec<ToolSpec>,
}

impl ToolRegistry {
    /// Create a registry over the given stores.
    pub fn new(goals: GoalStore, milestones: MilestoneStore, progress: ProgressStore) -> Self {
        Self {
            goals,
            milestones,
            progress,
            specs: goal_tool_specs(),
        }
    }

    /// The tool catalog advertised to the model.
    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Dispatch a tool call by name, parsing arguments from JSON.
    ///
    /// Success payloads carry `"success": true` plus the operation's result
    /// fields; use [`ToolError::to_result_json`] on the error arm to keep the
    /// wire shape uniform.
    pub async fn dispatch(&self, name: &str, arguments_json: &str) -> ToolResult {
        debug!("Dispatching tool '{}' with args: {}", name, arguments_json);

        let args: Value = serde_json::from_str(arguments_json).map_err(|e| {
            ToolError::InvalidArguments(format!("Failed to parse arguments JSON: {}", e))
        })?;

        match name {
            "create_goal" => self.create_goal(&args).await,
            "get_goals" => self.get_goals(&args).await,
            "get_goal_details" => self.get_goal_details(&args).await,
            "add_milestone" => self.add_milestone(&args).await,
            "log_progress" => self.log_progress(&args).await,
            "update_goal" => self.update_goal(&args).await,
            "get_analytics" => self.get_analytics(&args).await,
            other => {
                warn!("Unknown tool requested: {}", other);
                Err(ToolError::UnknownTool(other.to_string()))
            }
        }
    }

    async fn create_goal(&self, args: &Value) -> ToolResult {
        let title = required_str(args, "title")?;

        let goal = NewGoal {
            user_id: opt_str(args, "user_id").unwrap_or_else(|| "default".to_string()),
            title: title.clone(),
            description: opt_str(args, "description").unwrap_or_default(),
            category: opt_str(args, "category").unwrap_or_else(|| "personal".to_string()),
            priority: opt_i64(args, "priority").unwrap_or(3),
            target_date: opt_str(args, "target_date"),
            // Provenance marker so agent-created goals are distinguishable
            metadata: json!({
                "created_by": "stride-agent",
                "smart_validated": true,
                "version": "1.0",
            }),
        };

        let goal_id = self.goals.create_goal(goal).await?;

        Ok(json!({
            "success": true,
            "goal_id": goal_id,
            "message": format!("Goal '{}' created successfully with ID: {}", title, goal_id),
        }))
    }

    async fn get_goals(&self, args: &Value) -> ToolResult {
        let user_id = opt_str(args, "user_id").unwrap_or_else(|| "default".to_string());
        let status = opt_str(args, "status").unwrap_or_else(|| "active".to_string());
        let limit = opt_i64(args, "limit");

        let goals = self.goals.get_goals(&user_id, &status, limit).await?;

        Ok(json!({
            "success": true,
            "count": goals.len(),
            "goals": goals,
        }))
    }

    async fn get_goal_details(&self, args: &Value) -> ToolResult {
        let goal_id = required_str(args, "goal_id")?;

        let Some(goal) = self.goals.get_goal_by_id(&goal_id).await? else {
            return Err(ToolError::NotFound("Goal not found".to_string()));
        };

        let milestones = self.milestones.get_milestones(&goal_id).await?;
        let recent_progress = self.progress.get_progress_logs(&goal_id, Some(10)).await?;

        Ok(json!({
            "success": true,
            "goal": goal,
            "milestones": milestones,
            "recent_progress": recent_progress,
        }))
    }

    async fn add_milestone(&self, args: &Value) -> ToolResult {
        let goal_id = required_str(args, "goal_id")?;
        let title = required_str(args, "milestone_title")?;

        let milestone = NewMilestone {
            title: title.clone(),
            description: opt_str(args, "milestone_description").unwrap_or_default(),
            due_date: opt_str(args, "due_date"),
            priority: opt_i64(args, "priority").unwrap_or(3),
        };

        let milestone_id = self.milestones.add_milestone(&goal_id, milestone).await?;

        Ok(json!({
            "success": true,
            "milestone_id": milestone_id,
            "message": format!("Milestone '{}' added to goal successfully", title),
        }))
    }

    async fn log_progress(&self, args: &Value) -> ToolResult {
        let goal_id = required_str(args, "goal_id")?;
        let progress_type = required_str(args, "progress_type")?;
        let content = required_str(args, "content")?;
        let metadata = args.get("metadata").filter(|m| m.is_object()).cloned();

        let log_id = self
            .progress
            .log_progress(&goal_id, &progress_type, &content, metadata)
            .await?;

        Ok(json!({
            "success": true,
            "log_id": log_id,
            "message": "Progress logged successfully",
        }))
    }

    async fn update_goal(&self, args: &Value) -> ToolResult {
        let goal_id = required_str(args, "goal_id")?;

        let empty = Map::new();
        let fields = args.as_object().unwrap_or(&empty);
        let mut update = GoalUpdate::default();

        for (key, value) in fields {
            // Null and empty-string values cannot clear a field; they are
            // dropped before reaching the store.
            if value.is_null() || value.as_str().is_some_and(|s| s.is_empty()) {
                continue;
            }

            match key.as_str() {
                "goal_id" => {}
                "title" => update.title = value.as_str().map(String::from),
                "description" => update.description = value.as_str().map(String::from),
                "category" => update.category = value.as_str().map(String::from),
                "status" => {
                    let status: GoalStatus = value
                        .as_str()
                        .unwrap_or_default()
                        .parse()
                        .map_err(|_| {
                            ToolError::InvalidArguments(format!("Invalid status value: {}", value))
                        })?;
                    update.status = Some(status);
                }
                "priority" => {
                    update.priority = Some(value_as_i64(value).ok_or_else(|| {
                        ToolError::InvalidArguments(format!("Invalid priority value: {}", value))
                    })?);
                }
                "progress_percentage" => {
                    update.progress_percentage = Some(value_as_i64(value).ok_or_else(|| {
                        ToolError::InvalidArguments(format!(
                            "Invalid progress_percentage value: {}",
                            value
                        ))
                    })?);
                }
                "target_date" => update.target_date = value.as_str().map(String::from),
                // Closed field set: unrecognized keys are never forwarded
                other => debug!("Ignoring unrecognized update field '{}'", other),
            }
        }

        let changed = self.goals.update_goal(&goal_id, update).await?;
        if changed {
            Ok(json!({"success": true, "message": "Goal updated successfully"}))
        } else {
            Err(ToolError::NotFound(
                "Goal not found or no changes made".to_string(),
            ))
        }
    }

    async fn get_analytics(&self, args: &Value) -> ToolResult {
        let user_id = opt_str(args, "user_id").unwrap_or_else(|| "default".to_string());

        let analytics = self.goals.get_goal_analytics(&user_id).await?;

        Ok(json!({
            "success": true,
            "analytics": analytics,
        }))
    }
}

/// Extract a required string argument.
fn required_str(args: &Value, key: &str) -> std::result::Result<String, ToolError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| ToolError::InvalidArguments(format!("Missing required argument '{}'", key)))
}

/// Extract an optional string argument, treating the empty string as absent.
fn opt_str(args: &Value, key: &str) -> Option<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Extract an optional integer argument.
fn opt_i64(args: &Value, key: &str) -> Option<i64> {
    args.get(key).and_then(value_as_i64)
}

/// Coerce a JSON value into an integer. Models occasionally send numbers as
/// floats or strings.
fn value_as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}
