use crate::{
    domain::requests::invoice::CreateInvoiceRecordRequest,
    model::{invoice::Invoice as InvoiceModel, status::InvoiceStatus},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynInvoiceCommandRepository = Arc<dyn InvoiceCommandRepositoryTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait InvoiceCommandRepositoryTrait {
    /// Returns the already stored invoice when one exists for the order.
    async fn create_invoice(
        &self,
        req: &CreateInvoiceRecordRequest,
    ) -> Result<InvoiceModel, RepositoryError>;
    async fn update_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<InvoiceModel, RepositoryError>;
    async fn delete_invoice(&self, id: Uuid) -> Result<InvoiceModel, RepositoryError>;
}
