//! Integration tests for the goal tool registry
//!
//! Dispatches every tool through the public registry API with JSON argument
//! strings, the way the orchestrator does, and checks the wire shape of both
//! success payloads and errors.

use serde_json::{json, Value};
use stride_engine::db::Database;
use stride_engine::tools::{ToolError, ToolRegistry};
use tempfile::TempDir;

async fn setup() -> (TempDir, Database, ToolRegistry) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("stride.db"))
        .await
        .unwrap();
    let registry = ToolRegistry::new(db.goals(), db.milestones(), db.progress());
    (temp_dir, db, registry)
}

async fn dispatch_ok(registry: &ToolRegistry, name: &str, args: Value) -> Value {
    registry
        .dispatch(name, &args.to_string())
        .await
        .unwrap_or_else(|e| panic!("{} failed: {}", name, e))
}

#[tokio::test]
async fn test_create_goal_wire_shape() {
    let (_tmp, _db, registry) = setup().await;

    let result = dispatch_ok(
        &registry,
        "create_goal",
        json!({
            "title": "Learn to cook",
            "category": "personal",
            "priority": 4,
            "target_date": "2026-12-31"
        }),
    )
    .await;

    assert_eq!(result["success"], json!(true));
    let goal_id = result["goal_id"].as_str().unwrap();
    assert!(!goal_id.is_empty());
    assert_eq!(
        result["message"],
        json!(format!(
            "Goal 'Learn to cook' created successfully with ID: {}",
            goal_id
        ))
    );
}

#[tokio::test]
async fn test_create_goal_requires_title() {
    let (_tmp, _db, registry) = setup().await;

    let err = registry
        .dispatch("create_goal", r#"{"category": "personal"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));

    // Error wire shape uses the `error` key
    let payload = err.to_result_json();
    assert_eq!(payload["success"], json!(false));
    assert!(payload["error"].as_str().unwrap().contains("title"));
    assert!(payload.get("message").is_none());
}

#[tokio::test]
async fn test_create_goal_clamps_priority() {
    let (_tmp, db, registry) = setup().await;

    let result = dispatch_ok(
        &registry,
        "create_goal",
        json!({"title": "Over-eager", "priority": 99}),
    )
    .await;
    let goal_id = result["goal_id"].as_str().unwrap();

    let goal = db.goals().get_goal_by_id(goal_id).await.unwrap().unwrap();
    assert_eq!(goal.priority, 5);
}

#[tokio::test]
async fn test_get_goals_defaults_and_filters() {
    let (_tmp, _db, registry) = setup().await;

    dispatch_ok(&registry, "create_goal", json!({"title": "A"})).await;
    dispatch_ok(&registry, "create_goal", json!({"title": "B"})).await;

    // No arguments: user "default", status "active"
    let result = dispatch_ok(&registry, "get_goals", json!({})).await;
    assert_eq!(result["success"], json!(true));
    assert_eq!(result["count"], json!(2));
    assert_eq!(result["goals"].as_array().unwrap().len(), 2);

    // A different user sees nothing
    let result = dispatch_ok(&registry, "get_goals", json!({"user_id": "alice"})).await;
    assert_eq!(result["count"], json!(0));
}

#[tokio::test]
async fn test_get_goal_details_composes_related_records() {
    let (_tmp, _db, registry) = setup().await;

    let created = dispatch_ok(&registry, "create_goal", json!({"title": "Ship v1"})).await;
    let goal_id = created["goal_id"].as_str().unwrap();

    dispatch_ok(
        &registry,
        "add_milestone",
        json!({"goal_id": goal_id, "milestone_title": "Feature freeze"}),
    )
    .await;
    dispatch_ok(
        &registry,
        "log_progress",
        json!({"goal_id": goal_id, "progress_type": "update", "content": "halfway there"}),
    )
    .await;

    let result = dispatch_ok(&registry, "get_goal_details", json!({"goal_id": goal_id})).await;
    assert_eq!(result["success"], json!(true));
    assert_eq!(result["goal"]["title"], json!("Ship v1"));
    assert_eq!(result["milestones"].as_array().unwrap().len(), 1);
    assert_eq!(
        result["milestones"][0]["title"],
        json!("Feature freeze")
    );
    assert_eq!(result["recent_progress"].as_array().unwrap().len(), 1);
    assert_eq!(
        result["recent_progress"][0]["content"],
        json!("halfway there")
    );
}

#[tokio::test]
async fn test_get_goal_details_miss_uses_message_key() {
    let (_tmp, _db, registry) = setup().await;

    let err = registry
        .dispatch("get_goal_details", r#"{"goal_id": "ghost"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::NotFound(_)));

    let payload = err.to_result_json();
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["message"], json!("Goal not found"));
    assert!(payload.get("error").is_none());
}

#[tokio::test]
async fn test_add_milestone_and_log_progress_messages() {
    let (_tmp, _db, registry) = setup().await;

    let created = dispatch_ok(&registry, "create_goal", json!({"title": "Goal"})).await;
    let goal_id = created["goal_id"].as_str().unwrap();

    let result = dispatch_ok(
        &registry,
        "add_milestone",
        json!({"goal_id": goal_id, "milestone_title": "First step", "due_date": "2026-09-15"}),
    )
    .await;
    assert_eq!(
        result["message"],
        json!("Milestone 'First step' added to goal successfully")
    );
    assert!(!result["milestone_id"].as_str().unwrap().is_empty());

    let result = dispatch_ok(
        &registry,
        "log_progress",
        json!({
            "goal_id": goal_id,
            "progress_type": "achievement",
            "content": "did the thing",
            "metadata": {"mood": "great"}
        }),
    )
    .await;
    assert_eq!(result["message"], json!("Progress logged successfully"));
    assert!(!result["log_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_goal_filters_and_ignores() {
    let (_tmp, db, registry) = setup().await;

    let created = dispatch_ok(&registry, "create_goal", json!({"title": "Original"})).await;
    let goal_id = created["goal_id"].as_str().unwrap();

    // Null and empty-string values are dropped, unknown keys ignored
    let result = dispatch_ok(
        &registry,
        "update_goal",
        json!({
            "goal_id": goal_id,
            "title": "Renamed",
            "description": "",
            "target_date": null,
            "favorite_color": "green",
            "progress_percentage": "25"
        }),
    )
    .await;
    assert_eq!(result["message"], json!("Goal updated successfully"));

    let goal = db.goals().get_goal_by_id(goal_id).await.unwrap().unwrap();
    assert_eq!(goal.title, "Renamed");
    assert_eq!(goal.description, "");
    assert_eq!(goal.progress_percentage, 25);

    // Invalid status is rejected before the store
    let err = registry
        .dispatch(
            "update_goal",
            &json!({"goal_id": goal_id, "status": "abandoned"}).to_string(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));
}

#[tokio::test]
async fn test_update_missing_goal_not_found() {
    let (_tmp, _db, registry) = setup().await;

    let err = registry
        .dispatch(
            "update_goal",
            r#"{"goal_id": "ghost", "title": "Renamed"}"#,
        )
        .await
        .unwrap_err();

    let payload = err.to_result_json();
    assert_eq!(
        payload["message"],
        json!("Goal not found or no changes made")
    );
}

#[tokio::test]
async fn test_get_analytics_shape() {
    let (_tmp, _db, registry) = setup().await;

    dispatch_ok(&registry, "create_goal", json!({"title": "A", "category": "career"})).await;
    dispatch_ok(&registry, "create_goal", json!({"title": "B"})).await;

    let result = dispatch_ok(&registry, "get_analytics", json!({})).await;
    assert_eq!(result["success"], json!(true));
    assert_eq!(result["analytics"]["total_goals"], json!(2));
    assert_eq!(result["analytics"]["active_goals"], json!(2));
    assert!(result["analytics"]["status_breakdown"].is_array());
    assert!(result["analytics"]["category_breakdown"].is_array());
}

#[tokio::test]
async fn test_unknown_tool_and_malformed_arguments() {
    let (_tmp, _db, registry) = setup().await;

    let err = registry.dispatch("drop_tables", "{}").await.unwrap_err();
    assert!(matches!(err, ToolError::UnknownTool(_)));

    let err = registry
        .dispatch("create_goal", "not json at all")
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));
}

#[tokio::test]
async fn test_catalog_lists_all_seven_tools() {
    let (_tmp, _db, registry) = setup().await;

    let names: Vec<&str> = registry.specs().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "create_goal",
            "get_goals",
            "get_goal_details",
            "add_milestone",
            "log_progress",
            "update_goal",
            "get_analytics",
        ]
    );
}
