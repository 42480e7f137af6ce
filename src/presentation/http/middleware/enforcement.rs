use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::application::enforcement::dto::SUSPENDED_PAGE;
use crate::presentation::http::{
    errors::AppError, middleware::user::UserClaims, state::AppState,
};

/// Gates a route on the caller's moderation status.
///
/// Must run after [`super::user::require_user`]. Blocked users are redirected
/// to the suspension page; everyone else continues with the
/// [`AccessDecision`](crate::application::enforcement::dto::AccessDecision)
/// available as a request extension, so handlers can surface warnings.
pub async fn enforce_access(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let decision = state.gate.enforce_access(&claims.sub)?;

    if !decision.allowed {
        tracing::info!(
            user_id = %claims.sub,
            status = decision.status.as_str(),
            "Redirecting blocked user"
        );
        let target = decision.redirect_to.as_deref().unwrap_or(SUSPENDED_PAGE);
        return Ok(Redirect::to(target).into_response());
    }

    req.extensions_mut().insert(decision);
    Ok(next.run(req).await)
}
