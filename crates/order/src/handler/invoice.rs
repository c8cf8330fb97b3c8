use crate::{
    abstract_trait::lifecycle::DynInvoiceLifecycle,
    domain::{
        requests::invoice::{FindAllInvoices, SendInvoiceRequest, UpdateInvoiceStatusRequest},
        response::{
            invoice::{GeneratedInvoiceResponse, InvoiceResponse, InvoiceStatusUpdateResponse},
            notification::NotificationResult,
        },
    },
    middleware::{
        jwt::auth_middleware,
        validate::{SimpleValidatedJson, ValidatedQuery},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use shared::{
    domain::{
        Identity,
        responses::{ApiResponse, ApiResponsePagination},
    },
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/invoices/generate/{order_id}",
    tag = "Invoice",
    security(("bearer_auth" = [])),
    params(("order_id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 201, description = "Invoice for the order, created or existing, with the order link outcome", body = ApiResponse<GeneratedInvoiceResponse>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn generate_invoice(
    Extension(service): Extension<DynInvoiceLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.generate_invoice(&identity, order_id).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoice",
    security(("bearer_auth" = [])),
    params(FindAllInvoices),
    responses(
        (status = 200, description = "List of invoices", body = ApiResponsePagination<Vec<InvoiceResponse>>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn get_invoices(
    Extension(service): Extension<DynInvoiceLifecycle>,
    Extension(identity): Extension<Identity>,
    ValidatedQuery(params): ValidatedQuery<FindAllInvoices>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all_invoices(&identity, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/invoices/my",
    tag = "Invoice",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Invoices of the caller", body = ApiResponse<Vec<InvoiceResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_my_invoices(
    Extension(service): Extension<DynInvoiceLifecycle>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_my_invoices(&identity).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Invoice",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice details", body = ApiResponse<InvoiceResponse>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn get_invoice(
    Extension(service): Extension<DynInvoiceLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.get_invoice(&identity, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/invoices/order/{order_id}",
    tag = "Invoice",
    security(("bearer_auth" = [])),
    params(("order_id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Invoice of the order", body = ApiResponse<InvoiceResponse>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn get_invoice_by_order(
    Extension(service): Extension<DynInvoiceLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.get_invoice_by_order(&identity, order_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/invoices/{id}/status",
    tag = "Invoice",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = UpdateInvoiceStatusRequest,
    responses(
        (status = 200, description = "Invoice updated, with the order payment sync outcome", body = ApiResponse<InvoiceStatusUpdateResponse>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn update_invoice_status(
    Extension(service): Extension<DynInvoiceLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateInvoiceStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_invoice_status(&identity, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/invoices/{id}/send",
    tag = "Invoice",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = SendInvoiceRequest,
    responses(
        (status = 200, description = "Invoice emailed", body = ApiResponse<NotificationResult>),
        (status = 404, description = "Invoice not found"),
        (status = 503, description = "Email delivery failed")
    )
)]
pub async fn send_invoice(
    Extension(service): Extension<DynInvoiceLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    SimpleValidatedJson(body): SimpleValidatedJson<SendInvoiceRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.send_invoice(&identity, id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}/download",
    tag = "Invoice",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Rendered invoice document", content_type = "text/html", body = String),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn download_invoice(
    Extension(service): Extension<DynInvoiceLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let document = service.download_invoice(&identity, id).await?;

    let headers = [
        (header::CONTENT_TYPE, document.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name),
        ),
    ];

    Ok((StatusCode::OK, headers, document.bytes))
}

#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    tag = "Invoice",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice deleted", body = ApiResponse<InvoiceResponse>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Invoice not found")
    )
)]
pub async fn delete_invoice(
    Extension(service): Extension<DynInvoiceLifecycle>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete_invoice(&identity, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn invoice_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/invoices", get(get_invoices))
        .route("/api/invoices/my", get(get_my_invoices))
        .route("/api/invoices/generate/{order_id}", post(generate_invoice))
        .route("/api/invoices/order/{order_id}", get(get_invoice_by_order))
        .route("/api/invoices/{id}", get(get_invoice))
        .route("/api/invoices/{id}", delete(delete_invoice))
        .route("/api/invoices/{id}/status", put(update_invoice_status))
        .route("/api/invoices/{id}/send", post(send_invoice))
        .route("/api/invoices/{id}/download", get(download_invoice))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.invoice_lifecycle.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
