use crate::domain::{
    requests::{
        invoice::{FindAllInvoices, SendInvoiceRequest, UpdateInvoiceStatusRequest},
        order::{
            CreateOrderRequest, FindAllOrders, TrackOrderQuery, UpdateOrderRequest,
            UpdateOrderStatusRequest,
        },
        payment::CreatePaymentIntentRequest,
    },
    response::{
        invoice::{
            GeneratedInvoiceResponse, InvoiceDocument, InvoiceResponse,
            InvoiceStatusUpdateResponse,
        },
        notification::NotificationResult,
        order::{CreateOrderResponse, OrderResponse},
        payment::{PaymentIntentResponse, WebhookAck},
    },
};
use async_trait::async_trait;
use shared::{
    domain::{
        Caller, Identity,
        responses::{ApiResponse, ApiResponsePagination},
    },
    errors::ServiceError,
};
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderLifecycle = Arc<dyn OrderLifecycleTrait + Send + Sync>;
pub type DynInvoiceLifecycle = Arc<dyn InvoiceLifecycleTrait + Send + Sync>;
pub type DynPaymentLifecycle = Arc<dyn PaymentLifecycleTrait + Send + Sync>;

#[async_trait]
pub trait OrderLifecycleTrait {
    async fn create_order(
        &self,
        caller: &Caller,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<CreateOrderResponse>, ServiceError>;
    async fn track_order(
        &self,
        query: &TrackOrderQuery,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn find_all_orders(
        &self,
        identity: &Identity,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError>;
    async fn find_my_orders(
        &self,
        identity: &Identity,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;
    async fn get_order(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn update_order(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn update_order_status(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}

#[async_trait]
pub trait InvoiceLifecycleTrait {
    async fn generate_invoice(
        &self,
        identity: &Identity,
        order_id: Uuid,
    ) -> Result<ApiResponse<GeneratedInvoiceResponse>, ServiceError>;
    async fn find_all_invoices(
        &self,
        identity: &Identity,
        req: &FindAllInvoices,
    ) -> Result<ApiResponsePagination<Vec<InvoiceResponse>>, ServiceError>;
    async fn find_my_invoices(
        &self,
        identity: &Identity,
    ) -> Result<ApiResponse<Vec<InvoiceResponse>>, ServiceError>;
    async fn get_invoice(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<ApiResponse<InvoiceResponse>, ServiceError>;
    async fn get_invoice_by_order(
        &self,
        identity: &Identity,
        order_id: Uuid,
    ) -> Result<ApiResponse<InvoiceResponse>, ServiceError>;
    async fn update_invoice_status(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &UpdateInvoiceStatusRequest,
    ) -> Result<ApiResponse<InvoiceStatusUpdateResponse>, ServiceError>;
    async fn send_invoice(
        &self,
        identity: &Identity,
        id: Uuid,
        req: &SendInvoiceRequest,
    ) -> Result<ApiResponse<NotificationResult>, ServiceError>;
    async fn download_invoice(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<InvoiceDocument, ServiceError>;
    async fn delete_invoice(
        &self,
        identity: &Identity,
        id: Uuid,
    ) -> Result<ApiResponse<InvoiceResponse>, ServiceError>;
}

#[async_trait]
pub trait PaymentLifecycleTrait {
    async fn create_payment_intent(
        &self,
        identity: &Identity,
        req: &CreatePaymentIntentRequest,
    ) -> Result<ApiResponse<PaymentIntentResponse>, ServiceError>;
    /// Errors are returned only for bad signatures and persistence failures;
    /// everything else is acknowledged.
    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookAck, ServiceError>;
}
