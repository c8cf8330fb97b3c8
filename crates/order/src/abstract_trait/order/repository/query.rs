use crate::{domain::requests::order::FindAllOrders, model::order::Order as OrderModel};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderModel>, RepositoryError>;
    async fn find_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<OrderModel>, RepositoryError>;
    async fn find_by_customer(&self, customer_id: &str)
    -> Result<Vec<OrderModel>, RepositoryError>;
}
