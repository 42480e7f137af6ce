use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::ledger::dto::{ActionFilters, ActionStats};
use crate::domain::moderation::{
    entity::{ActionReason, ActionType, ModerationAction, NewModerationAction},
    status::UserStatus,
    value_objects::SubjectId,
};
use crate::domain::shared::{
    errors::DomainError,
    pagination::{PageRequest, PaginatedResponse},
};
use crate::presentation::http::{
    errors::AppError, middleware::user::UserClaims, state::AppState,
};

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateActionRequest {
    pub user_id: String,
    pub action_type: ActionType,
    pub reason: ActionReason,
    #[validate(range(min = 1, max = 3650))]
    pub duration_days: Option<u32>,
    #[validate(length(max = 128))]
    pub content_id: Option<String>,
    #[validate(length(max = 64))]
    pub content_type: Option<String>,
    #[validate(length(max = 5000))]
    pub details: Option<String>,
    #[validate(length(max = 5000))]
    pub internal_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionsQuery {
    pub user_id: Option<String>,
    #[serde(default = "default_action_type")]
    pub action_type: String,
    #[serde(default)]
    pub include_reversed: bool,
    #[serde(default)]
    pub include_expired: bool,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_action_type() -> String {
    "all".to_string()
}

pub(crate) fn default_page() -> i64 {
    1
}

pub(crate) fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize)]
pub struct ReverseActionRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserStandingResponse {
    pub user_id: String,
    pub status: UserStatus,
    pub active_actions: Vec<ModerationAction>,
}

pub(crate) fn page_request(page: i64, limit: i64) -> PageRequest {
    PageRequest::new(page, limit.clamp(1, MAX_PAGE_SIZE))
}

pub(crate) fn validated_subject(raw: &str) -> Result<String, AppError> {
    SubjectId::new(raw.to_string())
        .map(|id| id.value)
        .map_err(|_| AppError::BadRequest(format!("invalid user id: {}", raw)))
}

pub async fn create_action(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Json(req): Json<CreateActionRequest>,
) -> Result<(StatusCode, Json<ModerationAction>), AppError> {
    req.validate()?;
    let user_id = validated_subject(&req.user_id)?;

    if let Some(cooldown) = state.config.action_cooldown() {
        if state
            .ledger
            .has_recent_action(&user_id, req.action_type, cooldown)?
        {
            tracing::warn!(
                user_id = %user_id,
                action_type = %req.action_type,
                "Repeat action inside cool-down"
            );
            return Err(DomainError::RateLimitExceeded.into());
        }
    }

    let action = state.ledger.create_action(NewModerationAction {
        user_id,
        action_type: req.action_type,
        reason: req.reason,
        performed_by: claims.sub,
        duration_days: req.duration_days,
        content_id: req.content_id,
        content_type: req.content_type,
        details: req.details,
        internal_notes: req.internal_notes,
    })?;

    Ok((StatusCode::CREATED, Json(action)))
}

pub async fn list_actions(
    State(state): State<AppState>,
    Query(params): Query<ActionsQuery>,
) -> Result<Json<PaginatedResponse<ModerationAction>>, AppError> {
    let action_type = match params.action_type.as_str() {
        "all" => None,
        other => Some(
            other
                .parse::<ActionType>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        ),
    };
    let user_id = params
        .user_id
        .as_deref()
        .map(validated_subject)
        .transpose()?;

    let page = page_request(params.page, params.limit);
    let items = state.ledger.list_actions(&ActionFilters {
        user_id,
        action_type,
        include_reversed: params.include_reversed,
        include_expired: params.include_expired,
        page,
    })?;

    Ok(Json(PaginatedResponse {
        items,
        page: page.page(),
        limit: page.limit(),
    }))
}

pub async fn get_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ModerationAction>, AppError> {
    state
        .ledger
        .get_action(id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("action {}", id)))
}

pub async fn reverse_action(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReverseActionRequest>,
) -> Result<Json<ModerationAction>, AppError> {
    let reason = req
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    state
        .ledger
        .reverse_action(id, &claims.sub, reason)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("action {}", id)))
}

pub async fn user_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ModerationAction>>, AppError> {
    let user_id = validated_subject(&user_id)?;
    Ok(Json(state.ledger.get_user_history(&user_id)?))
}

pub async fn user_standing(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserStandingResponse>, AppError> {
    let user_id = validated_subject(&user_id)?;
    let status = state.ledger.check_user_status(&user_id)?;
    let active_actions = state.ledger.get_active_actions_for_user(&user_id)?;

    Ok(Json(UserStandingResponse {
        user_id,
        status,
        active_actions,
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<ActionStats>, AppError> {
    Ok(Json(state.ledger.get_stats()?))
}
