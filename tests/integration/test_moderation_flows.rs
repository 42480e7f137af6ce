use super::helpers::{
    TestApp, expect_status, get, issue_action, json_request, read_json, send, spawn_app,
    spawn_app_with, test_config, unique_user,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Duration;
use serde_json::{Value, json};
use std::collections::HashSet;

async fn access_for(app: &TestApp, user_id: &str) -> Value {
    let res = send(&app.app, get("/api/v1/me/access", &app.token_for(user_id))).await;
    read_json(expect_status(res, StatusCode::OK).await).await
}

#[tokio::test]
async fn suspension_blocks_access_until_reversed() {
    let app = spawn_app();
    let user = unique_user("suspended");

    let action = issue_action(
        &app,
        json!({
            "user_id": user,
            "action_type": "suspension",
            "reason": "harassment",
            "duration_days": 7,
            "internal_notes": "third report this week"
        }),
    )
    .await;
    assert_eq!(action["severity"], 2);
    assert!(action["ends_at"].is_string(), "7 day suspension should expire");

    let access = access_for(&app, &user).await;
    assert_eq!(access["allowed"], false);
    assert_eq!(access["redirect_to"], "/suspended");
    let message = access["message"].as_str().expect("missing message");
    assert!(message.contains("suspension"), "message was: {}", message);
    assert!(message.contains("Harassment or abuse"), "message was: {}", message);
    assert!(
        access["status"]["action"]["internal_notes"].is_null(),
        "internal notes must not reach the user"
    );
    assert!(
        access["status"]["action"].get("performed_by").is_none(),
        "the issuing moderator must not reach the user"
    );

    let gated = send(&app.app, get("/api/v1/me/status", &app.token_for(&user))).await;
    let gated = expect_status(gated, StatusCode::SEE_OTHER).await;
    assert_eq!(
        gated.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/suspended")
    );

    let suspension = send(&app.app, get("/api/v1/me/suspension", &app.token_for(&user))).await;
    let suspension: Value = read_json(expect_status(suspension, StatusCode::OK).await).await;
    assert_eq!(suspension["suspension"]["is_suspended"], true);
    assert_eq!(suspension["suspension"]["is_permanent"], false);
    assert!(
        suspension["suspension"]["time_remaining"]
            .as_str()
            .is_some_and(|t| t.starts_with("7 days") || t.starts_with("6 days")),
        "unexpected remaining time: {}",
        suspension["suspension"]["time_remaining"]
    );

    let action_id = action["id"].as_str().expect("missing action id");
    let reverse = send(
        &app.app,
        json_request(
            "POST",
            &format!("/api/v1/admin/moderation/actions/{}/reverse", action_id),
            &app.admin_token,
            json!({ "reason": "Mistaken identity" }),
        ),
    )
    .await;
    let reversed: Value = read_json(expect_status(reverse, StatusCode::OK).await).await;
    assert_eq!(reversed["reversed_by"], "moderator-1");
    assert_eq!(reversed["reversal_reason"], "Mistaken identity");

    let access = access_for(&app, &user).await;
    assert_eq!(access["allowed"], true);
    assert_eq!(access["status"]["status"], "active");

    let gated = send(&app.app, get("/api/v1/me/status", &app.token_for(&user))).await;
    expect_status(gated, StatusCode::OK).await;
}

#[tokio::test]
async fn temporary_suspension_lapses_when_clock_passes_end() {
    let app = spawn_app();
    let user = unique_user("lapsed");

    issue_action(
        &app,
        json!({
            "user_id": user,
            "action_type": "suspension",
            "reason": "spam",
            "duration_days": 1
        }),
    )
    .await;
    assert_eq!(access_for(&app, &user).await["allowed"], false);

    app.clock.advance(Duration::days(1) + Duration::seconds(1));

    let access = access_for(&app, &user).await;
    assert_eq!(access["allowed"], true);

    let active = send(
        &app.app,
        get(
            &format!("/api/v1/admin/moderation/actions?user_id={}", user),
            &app.admin_token,
        ),
    )
    .await;
    let active: Value = read_json(expect_status(active, StatusCode::OK).await).await;
    assert_eq!(active["items"].as_array().map(Vec::len), Some(0));

    let all = send(
        &app.app,
        get(
            &format!(
                "/api/v1/admin/moderation/actions?user_id={}&include_expired=true",
                user
            ),
            &app.admin_token,
        ),
    )
    .await;
    let all: Value = read_json(expect_status(all, StatusCode::OK).await).await;
    assert_eq!(all["items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn warning_lets_user_through_with_notice() {
    let app = spawn_app();
    let user = unique_user("warned");

    issue_action(
        &app,
        json!({ "user_id": user, "action_type": "warning", "reason": "spam" }),
    )
    .await;

    let res = send(&app.app, get("/api/v1/me/status", &app.token_for(&user))).await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(body["status"]["status"], "warning");
    let notice = body["notice"].as_str().expect("missing warning notice");
    assert!(notice.contains("Spam or misleading content"));

    let suspension = send(&app.app, get("/api/v1/me/suspension", &app.token_for(&user))).await;
    let suspension: Value = read_json(expect_status(suspension, StatusCode::OK).await).await;
    assert_eq!(suspension["suspension"]["is_suspended"], false);
    assert_eq!(suspension["suspension"]["is_banned"], false);
    assert!(suspension["ends_on"].is_null(), "warnings have no end date");
    assert!(
        suspension["description"]
            .as_str()
            .is_some_and(|d| d.contains("warning"))
    );

    let clean = send(
        &app.app,
        get("/api/v1/me/suspension", &app.token_for(&unique_user("clean"))),
    )
    .await;
    let clean: Value = read_json(expect_status(clean, StatusCode::OK).await).await;
    assert!(clean["suspension"].is_null());
}

#[tokio::test]
async fn ban_outranks_warning_and_is_permanent() {
    let app = spawn_app();
    let user = unique_user("banned");

    issue_action(
        &app,
        json!({ "user_id": user, "action_type": "warning", "reason": "spam" }),
    )
    .await;
    issue_action(
        &app,
        json!({
            "user_id": user,
            "action_type": "ban",
            "reason": "hate_speech",
            "duration_days": 30
        }),
    )
    .await;

    let standing = send(
        &app.app,
        get(
            &format!("/api/v1/admin/moderation/users/{}/status", user),
            &app.admin_token,
        ),
    )
    .await;
    let standing: Value = read_json(expect_status(standing, StatusCode::OK).await).await;
    assert_eq!(standing["status"]["status"], "banned");
    let active = standing["active_actions"].as_array().expect("active actions");
    assert_eq!(active.len(), 2);
    assert_eq!(active[0]["action_type"], "ban");
    assert!(active[0]["ends_at"].is_null(), "bans never carry an end date");

    let suspension = send(&app.app, get("/api/v1/me/suspension", &app.token_for(&user))).await;
    let suspension: Value = read_json(expect_status(suspension, StatusCode::OK).await).await;
    assert_eq!(suspension["suspension"]["is_banned"], true);
    assert_eq!(suspension["ends_on"], "Indefinite");
}

#[tokio::test]
async fn repeat_action_inside_cooldown_is_rate_limited() {
    let app = spawn_app();
    let user = unique_user("repeat");
    let body = json!({ "user_id": user, "action_type": "warning", "reason": "spam" });

    issue_action(&app, body.clone()).await;

    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/admin/moderation/actions",
            &app.admin_token,
            body.clone(),
        ),
    )
    .await;
    expect_status(res, StatusCode::TOO_MANY_REQUESTS).await;

    // A different type is not a repeat.
    issue_action(
        &app,
        json!({
            "user_id": user,
            "action_type": "suspension",
            "reason": "spam",
            "duration_days": 2
        }),
    )
    .await;

    app.clock.advance(Duration::minutes(61));
    issue_action(&app, body).await;
}

#[tokio::test]
async fn cooldown_can_be_disabled() {
    let mut config = test_config();
    config.action_cooldown_minutes = 0;
    let app = spawn_app_with(config);
    let body = json!({ "user_id": unique_user("nocool"), "action_type": "warning", "reason": "other" });

    issue_action(&app, body.clone()).await;
    issue_action(&app, body).await;
}

#[tokio::test]
async fn double_reversal_is_a_conflict() {
    let app = spawn_app();
    let action = issue_action(
        &app,
        json!({ "user_id": unique_user("twice"), "action_type": "warning", "reason": "copyright" }),
    )
    .await;
    let uri = format!(
        "/api/v1/admin/moderation/actions/{}/reverse",
        action["id"].as_str().expect("missing id")
    );

    let first = send(
        &app.app,
        json_request("POST", &uri, &app.admin_token, json!({ "reason": "First" })),
    )
    .await;
    expect_status(first, StatusCode::OK).await;

    let second = send(
        &app.app,
        json_request("POST", &uri, &app.admin_token, json!({ "reason": "Second" })),
    )
    .await;
    let body: Value = read_json(expect_status(second, StatusCode::CONFLICT).await).await;
    assert!(body["error"].as_str().is_some_and(|e| e.contains("already been reversed")));

    let fetched = send(
        &app.app,
        get(
            &format!("/api/v1/admin/moderation/actions/{}", action["id"].as_str().unwrap()),
            &app.admin_token,
        ),
    )
    .await;
    let fetched: Value = read_json(expect_status(fetched, StatusCode::OK).await).await;
    assert_eq!(fetched["reversal_reason"], "First");
}

#[tokio::test]
async fn action_listing_pages_do_not_overlap() {
    let app = spawn_app();
    for i in 0..5 {
        issue_action(
            &app,
            json!({
                "user_id": unique_user(&format!("paged{}", i)),
                "action_type": "warning",
                "reason": "terms_violation",
                "content_type": "prompt"
            }),
        )
        .await;
    }

    let mut seen = HashSet::new();
    let mut sizes = Vec::new();
    for page in 1..=3 {
        let res = send(
            &app.app,
            get(
                &format!(
                    "/api/v1/admin/moderation/actions?action_type=warning&page={}&limit=2",
                    page
                ),
                &app.admin_token,
            ),
        )
        .await;
        let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
        assert_eq!(body["page"], page);
        let items = body["items"].as_array().expect("items");
        sizes.push(items.len());
        for item in items {
            assert!(
                seen.insert(item["id"].as_str().expect("id").to_string()),
                "action listed twice"
            );
        }
    }

    assert_eq!(sizes, vec![2, 2, 1]);
}

#[tokio::test]
async fn stats_count_types_and_reasons() {
    let app = spawn_app();
    let user = unique_user("stats");
    issue_action(
        &app,
        json!({ "user_id": user, "action_type": "warning", "reason": "spam" }),
    )
    .await;
    let suspension = issue_action(
        &app,
        json!({ "user_id": user, "action_type": "suspension", "reason": "spam", "duration_days": 3 }),
    )
    .await;

    let reverse = send(
        &app.app,
        json_request(
            "POST",
            &format!(
                "/api/v1/admin/moderation/actions/{}/reverse",
                suspension["id"].as_str().expect("id")
            ),
            &app.admin_token,
            json!({}),
        ),
    )
    .await;
    expect_status(reverse, StatusCode::OK).await;

    let res = send(&app.app, get("/api/v1/admin/moderation/stats", &app.admin_token)).await;
    let stats: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(stats["total_actions"], 2);
    assert_eq!(stats["active_actions"], 1);
    assert_eq!(stats["by_type"]["warning"], 1);
    assert_eq!(stats["by_type"]["suspension"], 1);
    assert_eq!(stats["by_reason"]["spam"], 2);
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let app = spawn_app();

    let bad_user = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/admin/moderation/actions",
            &app.admin_token,
            json!({ "user_id": "has spaces", "action_type": "warning", "reason": "spam" }),
        ),
    )
    .await;
    expect_status(bad_user, StatusCode::BAD_REQUEST).await;

    let bad_duration = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/admin/moderation/actions",
            &app.admin_token,
            json!({
                "user_id": unique_user("long"),
                "action_type": "suspension",
                "reason": "spam",
                "duration_days": 9999
            }),
        ),
    )
    .await;
    expect_status(bad_duration, StatusCode::BAD_REQUEST).await;

    let bad_filter = send(
        &app.app,
        get("/api/v1/admin/moderation/actions?action_type=mute", &app.admin_token),
    )
    .await;
    expect_status(bad_filter, StatusCode::BAD_REQUEST).await;

    let missing = send(
        &app.app,
        get(
            "/api/v1/admin/moderation/actions/0194f123-4567-7abc-8def-0123456789ab",
            &app.admin_token,
        ),
    )
    .await;
    expect_status(missing, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn admin_routes_require_moderator_role() {
    let app = spawn_app();

    let as_user = send(
        &app.app,
        get("/api/v1/admin/moderation/stats", &app.token_for("regular-user")),
    )
    .await;
    expect_status(as_user, StatusCode::FORBIDDEN).await;

    let anonymous = Request::builder()
        .method("GET")
        .uri("/api/v1/admin/moderation/stats")
        .body(Body::empty())
        .expect("failed to build request");
    expect_status(send(&app.app, anonymous).await, StatusCode::UNAUTHORIZED).await;

    let forged = send(&app.app, get("/api/v1/me/access", "not-a-jwt")).await;
    expect_status(forged, StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
async fn health_reports_store_up() {
    let app = spawn_app();
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("failed to build request");
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = read_json(res).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "up");
}
