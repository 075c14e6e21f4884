//! Dashboard stats and completion trend over live board data.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, build_test_app, create_card, create_project, get, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_on_empty_database_are_zero(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/dashboard/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_cards"], 0);
    assert_eq!(json["data"]["completed_this_month"], 0);
    assert_eq!(json["data"]["overdue_sla"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_count_completed_overdue_and_inconsistent(pool: PgPool) {
    let project = create_project(&pool, json!({"name": "P"})).await;
    create_card(&pool, project.id, project.done, "Done now").await;
    let stale = create_card(&pool, project.id, project.done, "Done, date lost").await;
    create_card(&pool, project.id, project.todo, "Open").await;
    let overdue_due = (Utc::now() - Duration::days(3)).to_rfc3339();
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/cards",
        json!({
            "project_id": project.id,
            "column_id": project.doing,
            "title": "Late",
            "due_date": overdue_due,
        }),
    )
    .await;
    sqlx::query("UPDATE cards SET completion_date = NULL WHERE id = $1")
        .bind(stale["id"].as_i64().unwrap())
        .execute(&pool)
        .await
        .unwrap();

    let json = body_json(
        get(
            build_test_app(pool),
            &format!("/api/v1/dashboard/stats?project_id={}", project.id),
        )
        .await,
    )
    .await;
    let stats = &json["data"];
    assert_eq!(stats["total_cards"], 4);
    assert_eq!(stats["completed_this_month"], 1);
    assert_eq!(stats["completed_this_year"], 1);
    assert_eq!(stats["overdue_sla"], 1);
    assert_eq!(stats["inconsistent_completed_cards"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_filter_by_project(pool: PgPool) {
    let first = create_project(&pool, json!({"name": "A"})).await;
    let second = create_project(&pool, json!({"name": "B"})).await;
    create_card(&pool, first.id, first.todo, "A1").await;
    create_card(&pool, second.id, second.todo, "B1").await;
    create_card(&pool, second.id, second.done, "B2").await;

    let json = body_json(
        get(
            build_test_app(pool.clone()),
            &format!("/api/v1/dashboard/stats?project_id={}", first.id),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["total_cards"], 1);
    assert_eq!(json["data"]["completed_this_month"], 0);

    let json = body_json(get(build_test_app(pool), "/api/v1/dashboard/stats").await).await;
    assert_eq!(json["data"]["total_cards"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trend_returns_twelve_monthly_buckets_by_default(pool: PgPool) {
    let project = create_project(&pool, json!({"name": "P"})).await;
    create_card(&pool, project.id, project.done, "This month").await;
    for days_ago in [40, 800] {
        let done = (Utc::now() - Duration::days(days_ago)).to_rfc3339();
        post_json(
            build_test_app(pool.clone()),
            "/api/v1/cards",
            json!({
                "project_id": project.id,
                "column_id": project.done,
                "title": format!("Done {days_ago} days ago"),
                "completion_date": done,
            }),
        )
        .await;
    }

    let response = get(build_test_app(pool), "/api/v1/dashboard/completion-trend").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["period"], "month");
    let buckets = json["data"]["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 12);
    assert_eq!(
        buckets[11]["label"],
        Utc::now().format("%Y-%m").to_string()
    );
    assert_eq!(buckets[11]["completed"], 1);
    let total: u64 = buckets
        .iter()
        .map(|b| b["completed"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trend_accepts_year_period(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        "/api/v1/dashboard/completion-trend?period=year",
    )
    .await;
    let json = body_json(response).await;
    let buckets = json["data"]["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets[11]["label"], Utc::now().format("%Y").to_string());
    assert!(buckets.iter().all(|b| b["completed"] == 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn trend_rejects_unknown_period(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        "/api/v1/dashboard/completion-trend?period=decade",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
