use crate::{
    domain::requests::order::{CreateOrderRequest, UpdateOrderRequest},
    model::{
        order::Order,
        status::{OrderStatus, Transition},
    },
};
use async_trait::async_trait;
use mockall::automock;
use shared::errors::ServiceError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait OrderCommandServiceTrait: Send + Sync {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
        customer_id: Option<String>,
    ) -> Result<Order, ServiceError>;
    async fn update_order(&self, id: Uuid, req: &UpdateOrderRequest)
    -> Result<Order, ServiceError>;
    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<(Order, Transition), ServiceError>;
    async fn unlink_invoice(&self, id: Uuid, invoice_id: Uuid) -> Result<(), ServiceError>;
}
