use axum::{
    Extension, Json,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{
    abstract_trait::DynJwtService,
    domain::{Caller, Identity},
    errors::ErrorResponse,
};

fn extract_token(cookie_jar: &CookieJar, req: &Request<Body>) -> Option<String> {
    cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
}

fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            status: "error".to_string(),
            message: message.to_string(),
        }),
    )
}

/// Requires a valid access token and exposes the caller as an `Identity`.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_token(&cookie_jar, &req)
        .ok_or_else(|| unauthorized("You are not logged in, please provide token"))?;

    let identity: Identity = jwt
        .verify_token(&token, "access")
        .map_err(|_| unauthorized("Invalid token"))?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Public routes: a valid token upgrades the caller, a missing one is a guest.
/// A token that is present but invalid is still rejected.
pub async fn optional_auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let caller = match extract_token(&cookie_jar, &req) {
        Some(token) => Caller::Authenticated(
            jwt.verify_token(&token, "access")
                .map_err(|_| unauthorized("Invalid token"))?,
        ),
        None => Caller::Guest,
    };

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
