use crate::{
    domain::response::notification::NotificationResult,
    model::{invoice::Invoice, order::Order, status::InvoiceStatus},
};
use async_trait::async_trait;
use mockall::automock;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynInvoiceCommandService = Arc<dyn InvoiceCommandServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait InvoiceCommandServiceTrait: Send + Sync {
    /// Idempotent per order: a second call returns the first invoice.
    async fn generate_invoice(&self, order: &Order) -> Result<Invoice, ServiceError>;
    async fn update_invoice_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<Invoice, ServiceError>;
    async fn delete_invoice(&self, id: Uuid) -> Result<Invoice, ServiceError>;
    /// A delivery that is not sent is reported as `ServiceError::Dependency`.
    async fn send_invoice_email(
        &self,
        invoice: &Invoice,
        destination: &str,
        message: Option<String>,
    ) -> Result<NotificationResult, ServiceError>;
}
