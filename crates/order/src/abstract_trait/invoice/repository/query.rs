use crate::{domain::requests::invoice::FindAllInvoices, model::invoice::Invoice as InvoiceModel};
use async_trait::async_trait;
use mockall::automock;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynInvoiceQueryRepository = Arc<dyn InvoiceQueryRepositoryTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait InvoiceQueryRepositoryTrait {
    async fn find_all(
        &self,
        req: &FindAllInvoices,
    ) -> Result<(Vec<InvoiceModel>, i64), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<InvoiceModel>, RepositoryError>;
    async fn find_by_order_id(
        &self,
        order_id: Uuid,
    ) -> Result<Option<InvoiceModel>, RepositoryError>;
    async fn find_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<InvoiceModel>, RepositoryError>;
}
