use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::order::{CreateOrderRecordRequest, UpdateOrderRecordRequest},
    model::order::Order as OrderModel,
    repository::order::ORDER_COLUMNS,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::types::Json;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
        INSERT INTO orders (
            order_id, customer_id, customer, items,
            subtotal, tax, shipping, discount, total,
            shipping_address, billing_address,
            status, payment_status, notes, estimated_delivery,
            status_updated_at, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                'pending', 'pending', $12, $13, $14, $14, $14)
        RETURNING {ORDER_COLUMNS}
        "#
        );

        let result = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(req.order_id)
            .bind(req.customer.id.as_deref())
            .bind(Json(&req.customer))
            .bind(Json(&req.items))
            .bind(req.totals.subtotal)
            .bind(req.totals.tax)
            .bind(req.totals.shipping)
            .bind(req.totals.discount)
            .bind(req.totals.total)
            .bind(Json(&req.shipping_address))
            .bind(req.billing_address.as_ref().map(Json))
            .bind(req.notes.as_deref())
            .bind(req.estimated_delivery)
            .bind(req.created_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to create order {}: {:?}", req.order_id, err);
                RepositoryError::from(err)
            })?;

        info!(
            "✅ Created order {} ({})",
            result.order_number, result.order_id
        );
        Ok(result)
    }

    async fn update_order(
        &self,
        req: &UpdateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
        UPDATE orders
        SET status            = COALESCE($3, status),
            payment_status    = COALESCE($4, payment_status),
            tracking_number   = COALESCE($5, tracking_number),
            invoice_id        = COALESCE($6, invoice_id),
            notes             = COALESCE($7, notes),
            status_updated_at = COALESCE($8, status_updated_at),
            updated_at        = $9
        WHERE order_id = $1 AND status = $2
        RETURNING {ORDER_COLUMNS}
        "#
        );

        let result = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(req.order_id)
            .bind(req.expected_status)
            .bind(req.status)
            .bind(req.payment_status)
            .bind(req.tracking_number.as_deref())
            .bind(req.invoice_id)
            .bind(req.notes.as_deref())
            .bind(req.status_updated_at)
            .bind(req.updated_at)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to update order {}: {:?}", req.order_id, err);
                RepositoryError::from(err)
            })?;

        if let Some(order) = result {
            info!("✅ Updated order {}", order.order_id);
            return Ok(order);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE order_id = $1)")
            .bind(req.order_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        if exists {
            warn!(
                "⚠️ Order {} changed status concurrently (expected {})",
                req.order_id, req.expected_status
            );
            Err(RepositoryError::Conflict(format!(
                "order {} was modified concurrently",
                req.order_id
            )))
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    async fn clear_invoice(
        &self,
        order_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
        UPDATE orders
        SET invoice_id = NULL,
            updated_at = now()
        WHERE order_id = $1 AND invoice_id = $2
        RETURNING {ORDER_COLUMNS}
        "#
        );

        let result = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(order_id)
            .bind(invoice_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to clear invoice {} from order {}: {:?}",
                    invoice_id, order_id, err
                );
                RepositoryError::from(err)
            })?;

        Ok(result)
    }
}
