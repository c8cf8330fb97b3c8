use crate::{
    abstract_trait::invoice::repository::InvoiceQueryRepositoryTrait,
    domain::requests::invoice::FindAllInvoices,
    model::invoice::Invoice as InvoiceModel,
    repository::invoice::INVOICE_COLUMNS,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct InvoiceQueryRepository {
    db: ConnectionPool,
}

impl InvoiceQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

const SEARCH_FILTER: &str = r#"
        ($1 = ''
            OR invoice_number ILIKE '%' || $1 || '%'
            OR order_number ILIKE '%' || $1 || '%'
            OR customer->>'name' ILIKE '%' || $1 || '%'
            OR customer->>'email' ILIKE '%' || $1 || '%')
        AND ($2::varchar IS NULL OR status = $2)
"#;

#[async_trait]
impl InvoiceQueryRepositoryTrait for InvoiceQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllInvoices,
    ) -> Result<(Vec<InvoiceModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching invoices page={} page_size={} search={:?}",
            req.page, req.page_size, req.search
        );

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let limit = i64::from(req.page_size);
        let offset = i64::from((req.page - 1).max(0)) * limit;

        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE {SEARCH_FILTER} ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );

        let invoices = sqlx::query_as::<_, InvoiceModel>(&sql)
            .bind(req.search.as_str())
            .bind(req.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch invoices: {:?}", err);
                RepositoryError::from(err)
            })?;

        let count_sql = format!("SELECT COUNT(*) FROM invoices WHERE {SEARCH_FILTER}");

        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(req.search.as_str())
            .bind(req.status)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to count invoices: {:?}", err);
                RepositoryError::from(err)
            })?;

        Ok((invoices, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InvoiceModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_id = $1");

        sqlx::query_as::<_, InvoiceModel>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch invoice {}: {:?}", id, err);
                RepositoryError::from(err)
            })
    }

    async fn find_by_order_id(
        &self,
        order_id: Uuid,
    ) -> Result<Option<InvoiceModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE order_id = $1");

        sqlx::query_as::<_, InvoiceModel>(&sql)
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to fetch invoice for order {}: {:?}",
                    order_id, err
                );
                RepositoryError::from(err)
            })
    }

    async fn find_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<InvoiceModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE customer_id = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, InvoiceModel>(&sql)
            .bind(customer_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to fetch invoices for customer {}: {:?}",
                    customer_id, err
                );
                RepositoryError::from(err)
            })
    }
}
