use crate::{
    domain::{requests::notification::NotificationRequest, response::notification::NotificationResult},
    model::notification::{Channel, NotificationRecord},
};
use async_trait::async_trait;
use mockall::automock;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;
use uuid::Uuid;

pub type DynNotificationChannel = Arc<dyn NotificationChannelTrait + Send + Sync>;
pub type DynNotificationRepository = Arc<dyn NotificationRepositoryTrait + Send + Sync>;
pub type DynNotificationService = Arc<dyn NotificationServiceTrait + Send + Sync>;

/// A single outbound provider, such as SMS or SMTP.
#[automock]
#[async_trait]
pub trait NotificationChannelTrait: Send + Sync {
    fn channel(&self) -> Channel;
    fn is_enabled(&self) -> bool;
    /// Returns the provider message id when the provider supplies one.
    async fn deliver(
        &self,
        destination: &str,
        subject: &str,
        body: &str,
    ) -> Result<Option<String>, ServiceError>;
}

#[async_trait]
pub trait NotificationRepositoryTrait {
    async fn create(&self, record: &NotificationRecord) -> Result<(), RepositoryError>;
    async fn find_by_order(&self, order_id: Uuid)
    -> Result<Vec<NotificationRecord>, RepositoryError>;
}

/// Best-effort delivery: the outcome is reported, never raised.
#[automock]
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    async fn send(&self, req: &NotificationRequest) -> NotificationResult;
}
