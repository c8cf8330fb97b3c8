use crate::{
    abstract_trait::payment::PaymentEventRepositoryTrait,
    model::payment_event::ProcessedPaymentEvent,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct PaymentEventRepository {
    db: ConnectionPool,
}

impl PaymentEventRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentEventRepositoryTrait for PaymentEventRepository {
    async fn is_processed(&self, event_id: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM payment_events WHERE event_id = $1)")
            .bind(event_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to check payment event {}: {:?}", event_id, err);
                RepositoryError::from(err)
            })
    }

    async fn record_processed(&self, event: &ProcessedPaymentEvent) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query(
            r#"
        INSERT INTO payment_events (event_id, event_type, order_id, processed_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (event_id) DO NOTHING
        "#,
        )
        .bind(event.event_id.as_str())
        .bind(event.event_type.as_str())
        .bind(event.order_id)
        .bind(event.processed_at)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to record payment event {}: {:?}", event.event_id, err);
            RepositoryError::from(err)
        })?;

        info!("✅ Recorded payment event {}", event.event_id);
        Ok(())
    }
}
