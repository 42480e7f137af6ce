use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::admin_actions::{default_limit, default_page, page_request, validated_subject};
use crate::application::appeals::dto::{AppealFilters, AppealStats, UpdateAppealStatus};
use crate::application::review_appeal::dto::ReviewOutcome;
use crate::domain::appeal::entity::{Appeal, AppealStatus, ReviewDecision};
use crate::domain::shared::pagination::PaginatedResponse;
use crate::presentation::http::{
    errors::AppError, middleware::user::UserClaims, state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AppealsQuery {
    #[serde(default = "default_status")]
    pub status: String,
    pub user_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_status() -> String {
    "all".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewAppealRequest {
    pub status: ReviewDecision,
    #[validate(length(max = 5000))]
    pub admin_response: Option<String>,
}

pub async fn list_appeals(
    State(state): State<AppState>,
    Query(params): Query<AppealsQuery>,
) -> Result<Json<PaginatedResponse<Appeal>>, AppError> {
    let status = match params.status.as_str() {
        "all" => None,
        other => Some(
            other
                .parse::<AppealStatus>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        ),
    };
    let user_id = params
        .user_id
        .as_deref()
        .map(validated_subject)
        .transpose()?;

    let page = page_request(params.page, params.limit);
    let items = state.appeals.list_appeals(&AppealFilters {
        status,
        user_id,
        page,
    })?;

    Ok(Json(PaginatedResponse {
        items,
        page: page.page(),
        limit: page.limit(),
    }))
}

pub async fn get_appeal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appeal>, AppError> {
    state
        .appeals
        .get_appeal(id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("appeal {}", id)))
}

pub async fn review_appeal(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewAppealRequest>,
) -> Result<Json<ReviewOutcome>, AppError> {
    req.validate()?;

    state
        .review
        .execute(UpdateAppealStatus {
            appeal_id: id,
            status: req.status,
            reviewed_by: Some(claims.sub),
            admin_response: req.admin_response,
        })?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("appeal {}", id)))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<AppealStats>, AppError> {
    Ok(Json(state.appeals.get_stats()?))
}
