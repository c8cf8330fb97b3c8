use crate::{
    domain::requests::order::{CreateOrderRecordRequest, UpdateOrderRecordRequest},
    model::order::Order as OrderModel,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError>;
    /// Fails with `Conflict` when the stored status no longer matches
    /// `req.expected_status`.
    async fn update_order(
        &self,
        req: &UpdateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError>;
    async fn clear_invoice(
        &self,
        order_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<OrderModel>, RepositoryError>;
}
