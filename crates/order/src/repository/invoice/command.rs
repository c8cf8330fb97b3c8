use crate::{
    abstract_trait::invoice::repository::InvoiceCommandRepositoryTrait,
    domain::requests::invoice::CreateInvoiceRecordRequest,
    model::{invoice::Invoice as InvoiceModel, status::InvoiceStatus},
    repository::invoice::INVOICE_COLUMNS,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::types::Json;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct InvoiceCommandRepository {
    db: ConnectionPool,
}

impl InvoiceCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

/// `order_id` clashes are absorbed by `ON CONFLICT`, so a remaining unique
/// violation is the invoice number.
fn insert_error(req: &CreateInvoiceRecordRequest, err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            warn!(
                "⚠️ Invoice number {} is already taken ({:?})",
                req.invoice_number,
                db_err.constraint()
            );
            RepositoryError::AlreadyExists(req.invoice_number.clone())
        }
        _ => {
            error!(
                "❌ Failed to create invoice for order {}: {:?}",
                req.order_id, err
            );
            RepositoryError::from(err)
        }
    }
}

#[async_trait]
impl InvoiceCommandRepositoryTrait for InvoiceCommandRepository {
    async fn create_invoice(
        &self,
        req: &CreateInvoiceRecordRequest,
    ) -> Result<InvoiceModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
        INSERT INTO invoices (
            invoice_id, invoice_number, order_id, order_number, customer_id, customer, items,
            subtotal, tax, shipping, discount, total,
            status, due_date, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                'draft', $13, $14, $15, $15)
        ON CONFLICT (order_id) DO NOTHING
        RETURNING {INVOICE_COLUMNS}
        "#
        );

        let inserted = sqlx::query_as::<_, InvoiceModel>(&sql)
            .bind(req.invoice_id)
            .bind(req.invoice_number.as_str())
            .bind(req.order_id)
            .bind(req.order_number.as_str())
            .bind(req.customer.id.as_deref())
            .bind(Json(&req.customer))
            .bind(Json(&req.items))
            .bind(req.totals.subtotal)
            .bind(req.totals.tax)
            .bind(req.totals.shipping)
            .bind(req.totals.discount)
            .bind(req.totals.total)
            .bind(req.due_date)
            .bind(req.notes.as_deref())
            .bind(req.created_at)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| insert_error(req, err))?;

        if let Some(invoice) = inserted {
            info!(
                "✅ Created invoice {} for order {}",
                invoice.invoice_number, invoice.order_number
            );
            return Ok(invoice);
        }

        let existing_sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE order_id = $1");

        let existing = sqlx::query_as::<_, InvoiceModel>(&existing_sql)
            .bind(req.order_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(RepositoryError::from)?;

        match existing {
            Some(invoice) => {
                info!(
                    "ℹ️ Invoice {} already exists for order {}",
                    invoice.invoice_number, invoice.order_number
                );
                Ok(invoice)
            }
            None => Err(RepositoryError::Conflict(format!(
                "invoice for order {} could not be created",
                req.order_id
            ))),
        }
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<InvoiceModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
        UPDATE invoices
        SET status = $2,
            updated_at = $3
        WHERE invoice_id = $1
        RETURNING {INVOICE_COLUMNS}
        "#
        );

        let result = sqlx::query_as::<_, InvoiceModel>(&sql)
            .bind(id)
            .bind(status)
            .bind(updated_at)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to update invoice {}: {:?}", id, err);
                RepositoryError::from(err)
            })?
            .ok_or(RepositoryError::NotFound)?;

        info!("✅ Invoice {} is now {}", result.invoice_number, result.status);
        Ok(result)
    }

    async fn delete_invoice(&self, id: Uuid) -> Result<InvoiceModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("DELETE FROM invoices WHERE invoice_id = $1 RETURNING {INVOICE_COLUMNS}");

        let result = sqlx::query_as::<_, InvoiceModel>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to delete invoice {}: {:?}", id, err);
                RepositoryError::from(err)
            })?
            .ok_or(RepositoryError::NotFound)?;

        info!("🗑️ Deleted invoice {}", result.invoice_number);
        Ok(result)
    }
}
