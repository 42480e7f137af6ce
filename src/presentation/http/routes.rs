use super::{
    handlers::{admin_actions, admin_appeals, health, me},
    middleware::admin::require_admin,
    middleware::enforcement::enforce_access,
    middleware::request_id::request_id_middleware,
    middleware::user::require_user,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/moderation/actions",
            get(admin_actions::list_actions).post(admin_actions::create_action),
        )
        .route(
            "/api/v1/admin/moderation/actions/{id}",
            get(admin_actions::get_action),
        )
        .route(
            "/api/v1/admin/moderation/actions/{id}/reverse",
            post(admin_actions::reverse_action),
        )
        .route(
            "/api/v1/admin/moderation/users/{user_id}/history",
            get(admin_actions::user_history),
        )
        .route(
            "/api/v1/admin/moderation/users/{user_id}/status",
            get(admin_actions::user_standing),
        )
        .route(
            "/api/v1/admin/moderation/stats",
            get(admin_actions::get_stats),
        )
        .route("/api/v1/admin/appeals", get(admin_appeals::list_appeals))
        .route("/api/v1/admin/appeals/stats", get(admin_appeals::get_stats))
        .route(
            "/api/v1/admin/appeals/{id}",
            get(admin_appeals::get_appeal).patch(admin_appeals::review_appeal),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Blocked users must still reach these to see why and to appeal.
    let user_routes = Router::new()
        .route("/api/v1/me/access", get(me::get_access))
        .route("/api/v1/me/suspension", get(me::get_suspension))
        .route(
            "/api/v1/me/appeals",
            get(me::list_my_appeals).post(me::create_appeal),
        )
        .route(
            "/api/v1/me/actions/{id}/appeal-eligibility",
            get(me::appeal_eligibility),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let gated_routes = Router::new()
        .route("/api/v1/me/status", get(me::get_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), enforce_access))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(user_routes)
        .merge(gated_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
