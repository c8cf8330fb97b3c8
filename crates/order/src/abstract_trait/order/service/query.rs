use crate::{domain::requests::order::FindAllOrders, model::order::Order};
use async_trait::async_trait;
use mockall::automock;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait OrderQueryServiceTrait: Send + Sync {
    async fn find_all(&self, req: &FindAllOrders) -> Result<(Vec<Order>, i64), ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Order, ServiceError>;
    /// Mismatched number or email is the same not-found as an absent order.
    async fn find_by_number_and_email(
        &self,
        order_number: &str,
        email: &str,
    ) -> Result<Order, ServiceError>;
    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Order>, ServiceError>;
}
