use crate::{
    abstract_trait::lifecycle::DynOrderLifecycle,
    domain::{
        requests::order::{
            CreateOrderRequest, FindAllOrders, TrackOrderQuery, UpdateOrderRequest,
            UpdateOrderStatusRequest,
        },
        response::order::{CreateOrderResponse, OrderResponse},
    },
    middleware::{
        jwt::{auth_middleware, optional_auth_middleware},
        validate::{SimpleValidatedJson, ValidatedQuery},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use shared::{
    domain::{
        Caller, Identity,
        responses::{ApiResponse, ApiResponsePagination},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created, with the outcome of every follow-up step", body = ApiResponse<CreateOrderResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderLifecycle>,
    Extension(caller): Extension<Caller>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_order(&caller, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/track",
    tag = "Order",
    params(TrackOrderQuery),
    responses(
        (status = 200, description = "Order matching number and email", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn track_order(
    Extension(service): Extension<DynOrderLifecycle>,
    ValidatedQuery(params): ValidatedQuery<TrackOrderQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.track_order(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(FindAllOrders),
    responses(
        (status = 200, description = "List of orders", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn get_orders(
    Extension(service): Extension<DynOrderLifecycle>,
    Extension(identity): Extension<Identity>,
    ValidatedQuery(params): ValidatedQuery<FindAllOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all_orders(&identity, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/my",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders of the caller", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_my_orders(
    Extension(service): Extension<DynOrderLifecycle>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_my_orders(&identity).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.get_order(&identity, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Illegal status change")
    )
)]
pub async fn update_order(
    Extension(service): Extension<DynOrderLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_order(&identity, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed or left as is", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Illegal status change")
    )
)]
pub async fn update_order_status(
    Extension(service): Extension<DynOrderLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_order_status(&identity, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public = OpenApiRouter::new()
        .route("/api/orders", post(create_order))
        .route_layer(middleware::from_fn(optional_auth_middleware))
        .route("/api/orders/track", get(track_order));

    let protected = OpenApiRouter::new()
        .route("/api/orders", get(get_orders))
        .route("/api/orders/my", get(get_my_orders))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}", patch(update_order))
        .route("/api/orders/{id}/status", put(update_order_status))
        .route_layer(middleware::from_fn(auth_middleware));

    public
        .merge(protected)
        .layer(Extension(app_state.di_container.order_lifecycle.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
