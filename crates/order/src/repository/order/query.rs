use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::requests::order::FindAllOrders,
    model::order::Order as OrderModel,
    repository::order::ORDER_COLUMNS,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

const SEARCH_FILTER: &str = r#"
        ($1 = ''
            OR order_number ILIKE '%' || $1 || '%'
            OR customer->>'name' ILIKE '%' || $1 || '%'
            OR customer->>'email' ILIKE '%' || $1 || '%')
        AND ($2::varchar IS NULL OR status = $2)
"#;

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching orders page={} page_size={} search={:?}",
            req.page, req.page_size, req.search
        );

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let limit = i64::from(req.page_size);
        let offset = i64::from((req.page - 1).max(0)) * limit;

        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE {SEARCH_FILTER} ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );

        let orders = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(req.search.as_str())
            .bind(req.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch orders: {:?}", err);
                RepositoryError::from(err)
            })?;

        let count_sql = format!("SELECT COUNT(*) FROM orders WHERE {SEARCH_FILTER}");

        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(req.search.as_str())
            .bind(req.status)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to count orders: {:?}", err);
                RepositoryError::from(err)
            })?;

        info!("✅ Found {} orders (total {})", orders.len(), total);
        Ok((orders, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1");

        sqlx::query_as::<_, OrderModel>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch order {}: {:?}", id, err);
                RepositoryError::from(err)
            })
    }

    async fn find_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1");

        sqlx::query_as::<_, OrderModel>(&sql)
            .bind(order_number)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch order by number: {:?}", err);
                RepositoryError::from(err)
            })
    }

    async fn find_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<OrderModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, OrderModel>(&sql)
            .bind(customer_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to fetch orders for customer {}: {:?}",
                    customer_id, err
                );
                RepositoryError::from(err)
            })
    }
}
