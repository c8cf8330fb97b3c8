use crate::{domain::requests::invoice::FindAllInvoices, model::invoice::Invoice};
use async_trait::async_trait;
use mockall::automock;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynInvoiceQueryService = Arc<dyn InvoiceQueryServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait InvoiceQueryServiceTrait: Send + Sync {
    async fn find_all(&self, req: &FindAllInvoices)
    -> Result<(Vec<Invoice>, i64), ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Invoice, ServiceError>;
    async fn find_by_order_id(&self, order_id: Uuid) -> Result<Invoice, ServiceError>;
    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Invoice>, ServiceError>;
}
