use crate::{
    abstract_trait::lifecycle::DynPaymentLifecycle,
    domain::{
        requests::payment::CreatePaymentIntentRequest,
        response::payment::{PaymentIntentResponse, WebhookAck},
    },
    middleware::{jwt::auth_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::post,
};
use shared::{
    domain::{Identity, responses::ApiResponse},
    errors::{HttpError, ServiceError},
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

const SIGNATURE_HEADER: &str = "Stripe-Signature";

#[utoipa::path(
    post,
    path = "/api/payments/intent",
    tag = "Payment",
    security(("bearer_auth" = [])),
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 201, description = "Payment intent for the stored order total", body = ApiResponse<PaymentIntentResponse>),
        (status = 400, description = "Order is already paid or closed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Payment provider unavailable")
    )
)]
pub async fn create_payment_intent(
    Extension(service): Extension<DynPaymentLifecycle>,
    Extension(identity): Extension<Identity>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreatePaymentIntentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_payment_intent(&identity, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/payments/webhook",
    tag = "Payment",
    request_body(content = String, content_type = "application/json", description = "Raw provider event"),
    params(("Stripe-Signature" = String, Header, description = "Provider signature header")),
    responses(
        (status = 200, description = "Event acknowledged", body = WebhookAck),
        (status = 400, description = "Signature verification failed"),
        (status = 500, description = "Event could not be persisted, retry later")
    )
)]
pub async fn payment_webhook(
    Extension(service): Extension<DynPaymentLifecycle>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ServiceError::Signature("missing signature header".into()))?;

    let ack = service.handle_webhook(&body, signature).await?;
    Ok((StatusCode::OK, Json(ack)))
}

pub fn payment_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let protected = OpenApiRouter::new()
        .route("/api/payments/intent", post(create_payment_intent))
        .route_layer(middleware::from_fn(auth_middleware));

    OpenApiRouter::new()
        .route("/api/payments/webhook", post(payment_webhook))
        .merge(protected)
        .layer(Extension(app_state.di_container.payment_lifecycle.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
