use crate::{
    domain::response::payment::PaymentIntent,
    model::payment_event::{PaymentEvent, ProcessedPaymentEvent},
};
use async_trait::async_trait;
use mockall::automock;
use shared::errors::{RepositoryError, ServiceError};
use std::{collections::HashMap, sync::Arc};

pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;
pub type DynPaymentEventRepository = Arc<dyn PaymentEventRepositoryTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait PaymentGatewayTrait: Send + Sync {
    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        metadata: &HashMap<String, String>,
    ) -> Result<PaymentIntent, ServiceError>;
    /// Any verification failure is `ServiceError::Signature`.
    fn verify_and_parse_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<PaymentEvent, ServiceError>;
}

/// Ledger of provider events whose processing completed.
#[async_trait]
pub trait PaymentEventRepositoryTrait {
    async fn is_processed(&self, event_id: &str) -> Result<bool, RepositoryError>;
    async fn record_processed(&self, event: &ProcessedPaymentEvent) -> Result<(), RepositoryError>;
}
