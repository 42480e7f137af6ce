use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::enforcement::{
    dto::{AccessDecision, SuspensionInfo},
    use_case::{format_end_date, get_action_description},
};
use crate::domain::appeal::{
    entity::{Appeal, AppealEligibility, NewAppeal},
    value_objects::AppealExplanation,
};
use crate::domain::moderation::{entity::ModerationAction, status::UserStatus};
use crate::presentation::http::{
    errors::AppError, middleware::user::UserClaims, state::AppState,
};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: UserStatus,
    /// Warning notice from the enforcement gate, if any
    pub notice: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuspensionResponse {
    pub suspension: Option<SuspensionInfo>,
    /// Long-form end date, "Indefinite" for permanent actions. Absent for
    /// warnings.
    pub ends_on: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppealRequest {
    pub action_id: Uuid,
    pub explanation: String,
    #[validate(email)]
    pub user_email: Option<String>,
    #[validate(length(max = 100))]
    pub user_name: Option<String>,
}

/// Looks up an action owned by the caller. Someone else's action is reported
/// as missing rather than forbidden.
fn owned_action(
    state: &AppState,
    claims: &UserClaims,
    action_id: Uuid,
) -> Result<ModerationAction, AppError> {
    state
        .ledger
        .get_action(action_id)?
        .filter(|action| action.user_id == claims.sub)
        .ok_or_else(|| AppError::NotFound(format!("action {}", action_id)))
}

pub async fn get_access(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
) -> Result<Json<AccessDecision>, AppError> {
    let mut decision = state.gate.enforce_access(&claims.sub)?;
    decision.status = decision.status.redacted();
    Ok(Json(decision))
}

pub async fn get_suspension(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
) -> Result<Json<SuspensionResponse>, AppError> {
    let suspension = state.gate.get_suspension_info(&claims.sub)?;
    let (ends_on, description) = match &suspension {
        Some(info) => {
            let status = state.ledger.check_user_status(&claims.sub)?;
            let description = status
                .action()
                .map(|action| get_action_description(action.action_type, info.ends_at));
            let blocked = info.is_suspended || info.is_banned;
            let ends_at = info.ends_at.map(|ends_at| ends_at.to_rfc3339());
            (
                blocked.then(|| format_end_date(ends_at.as_deref())),
                description,
            )
        }
        None => (None, None),
    };

    Ok(Json(SuspensionResponse {
        suspension,
        ends_on,
        description,
    }))
}

/// Display view of the caller's standing. Routed behind the enforcement gate,
/// so only active or warned users reach it.
pub async fn get_status(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Extension(decision): Extension<AccessDecision>,
) -> Result<Json<StatusResponse>, AppError> {
    let status = state.ledger.check_user_status(&claims.sub)?.redacted();
    let description = status
        .action()
        .map(|action| get_action_description(action.action_type, action.ends_at));

    Ok(Json(StatusResponse {
        status,
        notice: decision.message,
        description,
    }))
}

pub async fn list_my_appeals(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
) -> Result<Json<Vec<Appeal>>, AppError> {
    Ok(Json(state.appeals.get_user_appeals(&claims.sub)?))
}

pub async fn appeal_eligibility(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Path(action_id): Path<Uuid>,
) -> Result<Json<AppealEligibility>, AppError> {
    let action = owned_action(&state, &claims, action_id)?;
    Ok(Json(
        state
            .appeals
            .can_appeal(action.id, &action.starts_at.to_rfc3339())?,
    ))
}

pub async fn create_appeal(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Json(req): Json<CreateAppealRequest>,
) -> Result<(StatusCode, Json<Appeal>), AppError> {
    req.validate()?;
    let explanation = AppealExplanation::new(req.explanation)?;
    let action = owned_action(&state, &claims, req.action_id)?;

    let eligibility = state
        .appeals
        .can_appeal(action.id, &action.starts_at.to_rfc3339())?;
    if !eligibility.can_appeal {
        return Err(AppError::Ineligible(
            eligibility
                .reason
                .unwrap_or_else(|| "This action cannot be appealed".to_string()),
        ));
    }

    let appeal = state.appeals.create_appeal(NewAppeal {
        action_id: action.id,
        user_id: claims.sub,
        user_email: req.user_email,
        user_name: req.user_name,
        explanation: explanation.value,
    })?;

    Ok((StatusCode::CREATED, Json(appeal)))
}
