use axum::{
    extract::{Request, State},
    http::{Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::warn;

use newsroom_types::api::Claims;

use crate::AppState;

/// Permission that grants a non-admin caller access to a write route.
fn required_permission(method: &Method) -> &'static str {
    match *method {
        Method::POST => "newsroom.post",
        Method::PATCH => "newsroom.patch",
        Method::DELETE => "newsroom.delete",
        _ => "newsroom.admin",
    }
}

/// Admin gate for write routes: validates the bearer JWT, then requires the
/// `admin` group or the route's permission. Claims go into request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let permission = required_permission(req.method());
    if !token_data.claims.allows(permission) {
        warn!("{} lacks {} for {}", token_data.claims.sub, permission, req.uri().path());
        return Err(StatusCode::FORBIDDEN);
    }

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}
