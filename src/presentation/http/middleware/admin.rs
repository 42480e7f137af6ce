use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::presentation::http::{
    errors::AppError, middleware::user::decode_required_user_claims, state::AppState,
};

pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = decode_required_user_claims(req.headers(), &state.config.jwt_secret)?;

    if !claims.is_admin() {
        return Err(AppError::Forbidden(format!(
            "user {} is not a moderator",
            claims.sub
        )));
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
