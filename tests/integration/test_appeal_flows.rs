use super::helpers::{
    TestApp, expect_status, file_appeal, get, issue_action, json_request, read_json, send,
    spawn_app, spawn_app_with, test_config, unique_user,
};
use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

async fn suspend(app: &TestApp, user: &str) -> String {
    let action = issue_action(
        app,
        json!({
            "user_id": user,
            "action_type": "suspension",
            "reason": "inappropriate",
            "duration_days": 3
        }),
    )
    .await;
    action["id"].as_str().expect("missing action id").to_string()
}

async fn review(app: &TestApp, appeal_id: &str, body: Value) -> axum::response::Response {
    send(
        &app.app,
        json_request(
            "PATCH",
            &format!("/api/v1/admin/appeals/{}", appeal_id),
            &app.admin_token,
            body,
        ),
    )
    .await
}

async fn appeal_stats(app: &TestApp) -> Value {
    let res = send(&app.app, get("/api/v1/admin/appeals/stats", &app.admin_token)).await;
    read_json(expect_status(res, StatusCode::OK).await).await
}

#[tokio::test]
async fn suspended_user_can_appeal_once() {
    let app = spawn_app();
    let user = unique_user("appellant");
    let action_id = suspend(&app, &user).await;

    let eligibility = send(
        &app.app,
        get(
            &format!("/api/v1/me/actions/{}/appeal-eligibility", action_id),
            &app.token_for(&user),
        ),
    )
    .await;
    let eligibility: Value = read_json(expect_status(eligibility, StatusCode::OK).await).await;
    assert_eq!(eligibility["can_appeal"], true);

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/me/appeals",
            &app.token_for(&user),
            json!({
                "action_id": action_id,
                "explanation": "  The flagged prompt was a quote from a news article.  ",
                "user_email": "appellant@example.com",
                "user_name": "Appellant"
            }),
        ),
    )
    .await;
    let appeal: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;
    assert_eq!(appeal["status"], "pending");
    assert_eq!(appeal["user_id"], user.as_str());
    assert_eq!(
        appeal["explanation"],
        "The flagged prompt was a quote from a news article."
    );
    let submitted: DateTime<Utc> = appeal["submitted_at"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("submitted_at");
    let deadline: DateTime<Utc> = appeal["deadline_at"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("deadline_at");
    assert_eq!(deadline - submitted, Duration::days(14));

    let eligibility = send(
        &app.app,
        get(
            &format!("/api/v1/me/actions/{}/appeal-eligibility", action_id),
            &app.token_for(&user),
        ),
    )
    .await;
    let eligibility: Value = read_json(expect_status(eligibility, StatusCode::OK).await).await;
    assert_eq!(eligibility["can_appeal"], false);

    let duplicate = file_appeal(&app, &user, &action_id, "Second attempt").await;
    let body: Value =
        read_json(expect_status(duplicate, StatusCode::UNPROCESSABLE_ENTITY).await).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.contains("already been submitted")),
        "unexpected error: {}",
        body["error"]
    );

    let mine = send(&app.app, get("/api/v1/me/appeals", &app.token_for(&user))).await;
    let mine: Value = read_json(expect_status(mine, StatusCode::OK).await).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn appeal_window_closes_after_seven_days() {
    let app = spawn_app();
    let user = unique_user("late");
    let action_id = suspend(&app, &user).await;

    app.clock.advance(Duration::days(8));

    let eligibility = send(
        &app.app,
        get(
            &format!("/api/v1/me/actions/{}/appeal-eligibility", action_id),
            &app.token_for(&user),
        ),
    )
    .await;
    let eligibility: Value = read_json(expect_status(eligibility, StatusCode::OK).await).await;
    assert_eq!(eligibility["can_appeal"], false);
    assert!(
        eligibility["reason"]
            .as_str()
            .is_some_and(|r| r.contains("within 7 days"))
    );

    let res = file_appeal(&app, &user, &action_id, "Sorry I am late").await;
    let body: Value = read_json(expect_status(res, StatusCode::UNPROCESSABLE_ENTITY).await).await;
    assert!(body["error"].as_str().is_some_and(|e| e.contains("expired")));
}

#[tokio::test]
async fn cannot_appeal_someone_elses_action() {
    let app = spawn_app();
    let owner = unique_user("owner");
    let action_id = suspend(&app, &owner).await;

    let res = file_appeal(&app, &unique_user("intruder"), &action_id, "Not mine").await;
    expect_status(res, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn blank_explanation_is_rejected() {
    let app = spawn_app();
    let user = unique_user("blank");
    let action_id = suspend(&app, &user).await;

    let res = file_appeal(&app, &user, &action_id, "   ").await;
    expect_status(res, StatusCode::BAD_REQUEST).await;

    let res = file_appeal(&app, &user, &action_id, &"x".repeat(5001)).await;
    expect_status(res, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn stats_count_each_status_once() {
    let app = spawn_app();

    let mut appeal_ids = Vec::new();
    for i in 0..4 {
        let user = unique_user(&format!("mixed{}", i));
        let action_id = suspend(&app, &user).await;
        let res = file_appeal(&app, &user, &action_id, "Please reconsider").await;
        let appeal: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;
        appeal_ids.push(appeal["id"].as_str().expect("id").to_string());
    }

    for (appeal_id, status) in appeal_ids[1..]
        .iter()
        .zip(["under_review", "approved", "denied"])
    {
        let res = review(&app, appeal_id, json!({ "status": status })).await;
        expect_status(res, StatusCode::OK).await;
    }

    let stats = appeal_stats(&app).await;
    assert_eq!(stats["total"], 4);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["under_review"], 1);
    assert_eq!(stats["approved"], 1);
    assert_eq!(stats["denied"], 1);
    assert_eq!(stats["overdue_count"], 0);

    app.clock.advance(Duration::days(15));
    let stats = appeal_stats(&app).await;
    assert_eq!(stats["overdue_count"], 2, "pending and under_review are overdue");

    let pending = send(
        &app.app,
        get("/api/v1/admin/appeals?status=pending", &app.admin_token),
    )
    .await;
    let pending: Value = read_json(expect_status(pending, StatusCode::OK).await).await;
    let items = pending["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], appeal_ids[0].as_str());
}

#[tokio::test]
async fn approving_an_appeal_lifts_the_suspension() {
    let app = spawn_app();
    let user = unique_user("lifted");
    let action_id = suspend(&app, &user).await;

    let res = file_appeal(&app, &user, &action_id, "Context was missing").await;
    let appeal: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;
    let appeal_id = appeal["id"].as_str().expect("id");

    let res = review(
        &app,
        appeal_id,
        json!({ "status": "approved", "admin_response": "Upheld on review" }),
    )
    .await;
    let outcome: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(outcome["appeal"]["status"], "approved");
    assert_eq!(outcome["appeal"]["reviewed_by"], "moderator-1");
    assert_eq!(outcome["appeal"]["admin_response"], "Upheld on review");
    assert_eq!(outcome["reversed_action"]["id"], action_id.as_str());
    assert_eq!(
        outcome["reversed_action"]["reversal_reason"],
        format!("Appeal {} approved", appeal_id)
    );

    let access = send(&app.app, get("/api/v1/me/access", &app.token_for(&user))).await;
    let access: Value = read_json(expect_status(access, StatusCode::OK).await).await;
    assert_eq!(access["allowed"], true);
}

#[tokio::test]
async fn resolved_appeals_are_final_by_default() {
    let app = spawn_app();
    let user = unique_user("final");
    let action_id = suspend(&app, &user).await;
    let res = file_appeal(&app, &user, &action_id, "Please").await;
    let appeal: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;
    let appeal_id = appeal["id"].as_str().expect("id");

    expect_status(
        review(&app, appeal_id, json!({ "status": "denied" })).await,
        StatusCode::OK,
    )
    .await;

    let res = review(&app, appeal_id, json!({ "status": "approved" })).await;
    let body: Value = read_json(expect_status(res, StatusCode::CONFLICT).await).await;
    assert_eq!(body["error"], "Appeal has already been denied");

    // The action stays in force.
    let access = send(&app.app, get("/api/v1/me/access", &app.token_for(&user))).await;
    let access: Value = read_json(expect_status(access, StatusCode::OK).await).await;
    assert_eq!(access["allowed"], false);
}

#[tokio::test]
async fn reopening_is_allowed_when_configured() {
    let mut config = test_config();
    config.appeals_allow_reopen = true;
    let app = spawn_app_with(config);
    let user = unique_user("reopen");
    let action_id = suspend(&app, &user).await;
    let res = file_appeal(&app, &user, &action_id, "Please").await;
    let appeal: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;
    let appeal_id = appeal["id"].as_str().expect("id");

    expect_status(
        review(&app, appeal_id, json!({ "status": "denied" })).await,
        StatusCode::OK,
    )
    .await;
    let res = review(&app, appeal_id, json!({ "status": "approved" })).await;
    let outcome: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(outcome["appeal"]["status"], "approved");
    assert!(outcome["reversed_action"].is_object());
}

#[tokio::test]
async fn pending_is_not_a_review_decision() {
    let app = spawn_app();
    let user = unique_user("pending");
    let action_id = suspend(&app, &user).await;
    let res = file_appeal(&app, &user, &action_id, "Please").await;
    let appeal: Value = read_json(expect_status(res, StatusCode::CREATED).await).await;

    let res = review(
        &app,
        appeal["id"].as_str().expect("id"),
        json!({ "status": "pending" }),
    )
    .await;
    assert!(res.status().is_client_error(), "got {}", res.status());

    let missing = review(
        &app,
        "0194f123-4567-7abc-8def-0123456789ab",
        json!({ "status": "denied" }),
    )
    .await;
    expect_status(missing, StatusCode::NOT_FOUND).await;
}
