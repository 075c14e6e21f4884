//! Project, column, and funnel deletes with their dependents.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_card, create_project, delete, get, post_json, put_json,
};
use serde_json::json;
use sqlx::PgPool;

async fn count(pool: &PgPool, sql: &str, id: i64) -> i64 {
    let (n,): (i64,) = sqlx::query_as(sql).bind(id).fetch_one(pool).await.unwrap();
    n
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_project_removes_everything_under_it(pool: PgPool) {
    let template = body_json(
        post_json(
            build_test_app(pool.clone()),
            "/api/v1/form-templates",
            json!({"name": "T", "fields": [{"label": "Nota", "kind": "text"}]}),
        )
        .await,
    )
    .await;
    let field_id = template["fields"][0]["id"].as_i64().unwrap();
    let project = create_project(
        &pool,
        json!({"name": "Doomed", "default_template_id": template["id"]}),
    )
    .await;
    let first = create_card(&pool, project.id, project.todo, "One").await;
    create_card(&pool, project.id, project.done, "Two").await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/cards/{}/form", first["id"]),
        json!({
            "status": "in_progress",
            "answers": [{"field_id": field_id, "value": {"type": "text", "value": "ok"}}],
        }),
    )
    .await;
    post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}/alerts", project.id),
        json!({"message": "Atrasado"}),
    )
    .await;

    let survivor = create_project(&pool, json!({"name": "Survivor"})).await;
    create_card(&pool, survivor.id, survivor.todo, "Untouched").await;

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}", project.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}", project.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/cards/{}", first["id"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let id = project.id;
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM cards WHERE project_id = $1", id).await, 0);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM board_columns WHERE project_id = $1", id).await,
        0
    );
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM alerts WHERE project_id = $1", id).await, 0);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM form_answers WHERE field_id = $1", field_id).await,
        0
    );

    let board = body_json(
        get(
            build_test_app(pool),
            &format!("/api/v1/projects/{}/board", survivor.id),
        )
        .await,
    )
    .await;
    assert_eq!(board["columns"][0]["cards"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_missing_project_returns_404(pool: PgPool) {
    let response = delete(build_test_app(pool), "/api/v1/projects/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn column_with_cards_cannot_be_deleted(pool: PgPool) {
    let project = create_project(&pool, json!({"name": "P"})).await;
    create_card(&pool, project.id, project.doing, "Busy").await;

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/columns/{}", project.doing),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONSTRAINT_VIOLATION");

    let columns = body_json(
        get(
            build_test_app(pool),
            &format!("/api/v1/projects/{}/columns", project.id),
        )
        .await,
    )
    .await;
    assert_eq!(columns.as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_column_can_be_deleted(pool: PgPool) {
    let project = create_project(&pool, json!({"name": "P"})).await;

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/columns/{}", project.doing),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let columns = body_json(
        get(
            build_test_app(pool),
            &format!("/api/v1/projects/{}/columns", project.id),
        )
        .await,
    )
    .await;
    let ids: Vec<i64> = columns
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![project.todo, project.done]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_rewrites_column_positions(pool: PgPool) {
    let project = create_project(&pool, json!({"name": "P"})).await;

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/projects/{}/columns/order", project.id),
        json!({"column_ids": [project.done, project.todo, project.doing]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let columns = body_json(response).await;
    let columns = columns.as_array().unwrap();
    assert_eq!(columns[0]["id"], project.done);
    assert_eq!(columns[0]["sort_order"], 0);
    assert_eq!(columns[2]["id"], project.doing);
    assert_eq!(columns[2]["sort_order"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reorder_with_partial_list_is_rejected(pool: PgPool) {
    let project = create_project(&pool, json!({"name": "P"})).await;

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/projects/{}/columns/order", project.id),
        json!({"column_ids": [project.done, project.todo]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn funnel_column_with_cards_cannot_be_deleted(pool: PgPool) {
    let column = body_json(
        post_json(
            build_test_app(pool.clone()),
            "/api/v1/sales-funnel/columns",
            json!({"name": "Proposta"}),
        )
        .await,
    )
    .await;
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/sales-funnel/cards",
        json!({"column_id": column["id"], "title": "Deal", "value_cents": 150_000}),
    )
    .await;

    let response = delete(
        build_test_app(pool),
        &format!("/api/v1/sales-funnel/columns/{}", column["id"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
