use crate::{
    abstract_trait::notification::NotificationRepositoryTrait,
    model::notification::NotificationRecord,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;
use uuid::Uuid;

#[derive(Clone)]
pub struct NotificationRepository {
    db: ConnectionPool,
}

impl NotificationRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    async fn create(&self, record: &NotificationRecord) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query(
            r#"
        INSERT INTO notifications (
            notification_id, channel, destination, body, order_id, outcome, diagnostic, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (notification_id) DO NOTHING
        "#,
        )
        .bind(record.notification_id.as_str())
        .bind(record.channel)
        .bind(record.destination.as_str())
        .bind(record.body.as_str())
        .bind(record.order_id)
        .bind(record.outcome)
        .bind(record.diagnostic.as_deref())
        .bind(record.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to store notification {}: {:?}",
                record.notification_id, err
            );
            RepositoryError::from(err)
        })?;

        Ok(())
    }

    async fn find_by_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<NotificationRecord>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, NotificationRecord>(
            r#"
        SELECT notification_id, channel, destination, body, order_id, outcome, diagnostic, created_at
        FROM notifications
        WHERE order_id = $1
        ORDER BY created_at ASC
        "#,
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to fetch notifications for order {}: {:?}",
                order_id, err
            );
            RepositoryError::from(err)
        })
    }
}
