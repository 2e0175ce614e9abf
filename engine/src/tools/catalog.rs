//! Tool catalog published to the model
//!
//! Each entry declares one callable operation with a JSON-Schema parameter
//! description. This catalog is the wire contract between the model and the
//! registry; the dispatch handlers in `tools::mod` validate against exactly
//! these shapes.

use crate::llm::ToolSpec;
use serde_json::json;

/// Build the full catalog of goal-management tools.
pub fn goal_tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "create_goal".to_string(),
            description: "Create a new SMART goal with title, description, and target date"
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "The goal title"},
                    "description": {"type": "string", "description": "Detailed goal description"},
                    "category": {"type": "string", "description": "Goal category (personal, professional, health, etc.)"},
                    "priority": {"type": "integer", "description": "Priority level 1-5 (5 = highest)", "minimum": 1, "maximum": 5},
                    "target_date": {"type": "string", "description": "Target completion date (YYYY-MM-DD)"},
                    "user_id": {"type": "string", "description": "Owner of the goal"}
                },
                "required": ["title"]
            }),
        },
        ToolSpec {
            name: "get_goals".to_string(),
            description: "Retrieve user's goals with optional filtering".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "user_id": {"type": "string", "description": "Owner of the goals"},
                    "status": {"type": "string", "description": "Goal status filter (active, completed, paused, archived, all)"},
                    "limit": {"type": "integer", "description": "Maximum number of goals to return"}
                }
            }),
        },
        ToolSpec {
            name: "get_goal_details".to_string(),
            description:
                "Get detailed information about a specific goal including milestones and progress"
                    .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "goal_id": {"type": "string", "description": "The goal ID"}
                },
                "required": ["goal_id"]
            }),
        },
        ToolSpec {
            name: "add_milestone".to_string(),
            description: "Add a milestone to an existing goal".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "goal_id": {"type": "string", "description": "The goal ID"},
                    "milestone_title": {"type": "string", "description": "Milestone title"},
                    "milestone_description": {"type": "string", "description": "Milestone description"},
                    "due_date": {"type": "string", "description": "Milestone due date (YYYY-MM-DD)"},
                    "priority": {"type": "integer", "description": "Milestone priority 1-5"}
                },
                "required": ["goal_id", "milestone_title"]
            }),
        },
        ToolSpec {
            name: "log_progress".to_string(),
            description: "Log progress, obstacles, or achievements for a goal".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "goal_id": {"type": "string", "description": "The goal ID"},
                    "progress_type": {"type": "string", "description": "Type: 'progress', 'obstacle', 'achievement', 'reflection'"},
                    "content": {"type": "string", "description": "Progress description"},
                    "metadata": {"type": "object", "description": "Optional extra key/value data"}
                },
                "required": ["goal_id", "progress_type", "content"]
            }),
        },
        ToolSpec {
            name: "update_goal".to_string(),
            description: "Update goal information".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "goal_id": {"type": "string", "description": "The goal ID"},
                    "title": {"type": "string", "description": "Updated goal title"},
                    "description": {"type": "string", "description": "Updated description"},
                    "category": {"type": "string", "description": "Updated category"},
                    "status": {"type": "string", "description": "Updated status", "enum": ["active", "completed", "paused", "archived"]},
                    "priority": {"type": "integer", "description": "Updated priority 1-5"},
                    "target_date": {"type": "string", "description": "Updated target date (YYYY-MM-DD)"},
                    "progress_percentage": {"type": "integer", "description": "Updated completion percentage"}
                },
                "required": ["goal_id"]
            }),
        },
        ToolSpec {
            name: "get_analytics".to_string(),
            description: "Get goal analytics and statistics for the user".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "user_id": {"type": "string", "description": "Owner of the goals"}
                }
            }),
        },
    ]
}
