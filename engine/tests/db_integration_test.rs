/// Integration tests for database module
///
/// Tests the complete store lifecycle including:
/// - Database creation and initialization
/// - WAL mode configuration
/// - Goal CRUD, ordering, and analytics
/// - Milestone and progress log behavior
use serde_json::json;
use stride_engine::db::{Database, GoalStatus, GoalUpdate, NewGoal, NewMilestone};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("stride.db");

    // Create database
    let db = Database::new(&db_path).await.unwrap();

    // Verify database file exists
    assert!(db_path.exists());

    // Verify WAL file exists (created when WAL mode is enabled)
    let wal_path = temp_dir.path().join("stride.db-wal");
    assert!(wal_path.exists());

    // Verify we can query the database
    let result = sqlx::query("SELECT COUNT(*) as count FROM goals")
        .fetch_one(db.pool())
        .await;

    assert!(result.is_ok());

    // Close database (flushes WAL)
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_database_schema_complete() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("stride.db");

    let db = Database::new(&db_path).await.unwrap();

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .unwrap();

    assert!(tables.contains(&"goals".to_string()), "goals table missing");
    assert!(
        tables.contains(&"milestones".to_string()),
        "milestones table missing"
    );
    assert!(
        tables.contains(&"progress_logs".to_string()),
        "progress_logs table missing"
    );

    // Migrations are idempotent: reopening the same file must succeed
    db.close().await.unwrap();
    let db = Database::new(&db_path).await.unwrap();
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_goal_crud_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("stride.db"))
        .await
        .unwrap();
    let goals = db.goals();

    // Create
    let goal_id = goals
        .create_goal(NewGoal {
            title: "Run a marathon".to_string(),
            description: "Complete a full 42.2km race".to_string(),
            category: "fitness".to_string(),
            priority: 4,
            target_date: Some("2026-06-01".to_string()),
            ..NewGoal::default()
        })
        .await
        .unwrap();

    // Read back
    let goal = goals.get_goal_by_id(&goal_id).await.unwrap().unwrap();
    assert_eq!(goal.title, "Run a marathon");
    assert_eq!(goal.category, "fitness");
    assert_eq!(goal.priority, 4);
    assert_eq!(goal.status, GoalStatus::Active);
    assert_eq!(goal.progress_percentage, 0);
    assert_eq!(goal.milestone_count, 0);

    // Update
    let changed = goals
        .update_goal(
            &goal_id,
            GoalUpdate {
                status: Some(GoalStatus::Completed),
                progress_percentage: Some(100),
                ..GoalUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(changed);

    let goal = goals.get_goal_by_id(&goal_id).await.unwrap().unwrap();
    assert_eq!(goal.status, GoalStatus::Completed);
    assert_eq!(goal.progress_percentage, 100);
    assert!(goal.updated_date >= goal.created_date);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_goal_listing_filters_and_order() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("stride.db"))
        .await
        .unwrap();
    let goals = db.goals();

    let low = goals
        .create_goal(NewGoal {
            title: "Read more".to_string(),
            priority: 2,
            ..NewGoal::default()
        })
        .await
        .unwrap();
    let high = goals
        .create_goal(NewGoal {
            title: "Ship the project".to_string(),
            priority: 5,
            ..NewGoal::default()
        })
        .await
        .unwrap();
    let paused = goals
        .create_goal(NewGoal {
            title: "Learn piano".to_string(),
            priority: 3,
            ..NewGoal::default()
        })
        .await
        .unwrap();
    goals
        .update_goal(
            &paused,
            GoalUpdate {
                status: Some(GoalStatus::Paused),
                ..GoalUpdate::default()
            },
        )
        .await
        .unwrap();

    // Active filter excludes the paused goal; priority descending
    let active = goals.get_goals("default", "active", None).await.unwrap();
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].id, high);
    assert_eq!(active[1].id, low);

    // "all" sentinel returns every status
    let all = goals.get_goals("default", "all", None).await.unwrap();
    assert_eq!(all.len(), 3);

    // Limit applies after ordering
    let top = goals.get_goals("default", "all", Some(1)).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, high);

    // Other users see nothing
    let none = goals.get_goals("alice", "all", None).await.unwrap();
    assert!(none.is_empty());

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_update_missing_goal_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("stride.db"))
        .await
        .unwrap();

    let changed = db
        .goals()
        .update_goal(
            "no-such-id",
            GoalUpdate {
                title: Some("x".to_string()),
                ..GoalUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(!changed);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_milestones_annotate_goal_count() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("stride.db"))
        .await
        .unwrap();
    let goals = db.goals();
    let milestones = db.milestones();

    let goal_id = goals
        .create_goal(NewGoal::new("Write a novel"))
        .await
        .unwrap();

    milestones
        .add_milestone(&goal_id, NewMilestone::new("Outline chapters"))
        .await
        .unwrap();
    milestones
        .add_milestone(&goal_id, NewMilestone::new("First draft"))
        .await
        .unwrap();

    let goal = goals.get_goal_by_id(&goal_id).await.unwrap().unwrap();
    assert_eq!(goal.milestone_count, 2);

    // Creation order is preserved
    let listed = milestones.get_milestones(&goal_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].title, "Outline chapters");
    assert_eq!(listed[1].title, "First draft");
    assert!(!listed[0].completed);

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_progress_logs_newest_first_with_limit() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("stride.db"))
        .await
        .unwrap();
    let goals = db.goals();
    let progress = db.progress();

    let goal_id = goals
        .create_goal(NewGoal::new("Get stronger"))
        .await
        .unwrap();

    for i in 0..12 {
        progress
            .log_progress(
                &goal_id,
                "update",
                &format!("session {}", i),
                Some(json!({"session": i})),
            )
            .await
            .unwrap();
    }

    // Default limit is 10, newest first
    let recent = progress.get_progress_logs(&goal_id, None).await.unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].content, "session 11");
    assert_eq!(recent[9].content, "session 2");

    let top3 = progress.get_progress_logs(&goal_id, Some(3)).await.unwrap();
    assert_eq!(top3.len(), 3);
    assert_eq!(top3[0].metadata["session"], json!(11));

    db.close().await.unwrap();
}

#[tokio::test]
async fn test_analytics_aggregates() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::new(&temp_dir.path().join("stride.db"))
        .await
        .unwrap();
    let goals = db.goals();

    for (title, category) in [
        ("Goal A", "fitness"),
        ("Goal B", "fitness"),
        ("Goal C", "career"),
    ] {
        goals
            .create_goal(NewGoal {
                title: title.to_string(),
                category: category.to_string(),
                ..NewGoal::default()
            })
            .await
            .unwrap();
    }
    let done = goals.get_goals("default", "all", Some(1)).await.unwrap()[0]
        .id
        .clone();
    goals
        .update_goal(
            &done,
            GoalUpdate {
                status: Some(GoalStatus::Completed),
                ..GoalUpdate::default()
            },
        )
        .await
        .unwrap();

    let analytics = db.goals().get_goal_analytics("default").await.unwrap();
    assert_eq!(analytics.total_goals, 3);
    assert_eq!(analytics.active_goals, 2);

    let status_count: i64 = analytics.status_breakdown.iter().map(|s| s.count).sum();
    assert_eq!(status_count, 3);
    let fitness = analytics
        .category_breakdown
        .iter()
        .find(|c| c.category == "fitness")
        .unwrap();
    assert_eq!(fitness.count, 2);

    // Empty user: zero counts, no error
    let empty = db.goals().get_goal_analytics("nobody").await.unwrap();
    assert_eq!(empty.total_goals, 0);
    assert!(empty.status_breakdown.is_empty());

    db.close().await.unwrap();
}
