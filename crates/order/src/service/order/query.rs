use crate::{
    abstract_trait::order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
    domain::requests::order::FindAllOrders,
    model::order::Order,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, ServiceTracer},
};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    tracer: ServiceTracer,
}

pub struct OrderQueryServiceDeps {
    pub query: DynOrderQueryRepository,
}

impl OrderQueryService {
    pub fn new(deps: OrderQueryServiceDeps, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "order_query_service", "OrderQueryService");

        Self {
            query: deps.query,
            tracer: ServiceTracer::new("order-query-service", metrics),
        }
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Order not found".into())
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_all(&self, req: &FindAllOrders) -> Result<(Vec<Order>, i64), ServiceError> {
        let tracing_ctx = self.tracer.start_tracing(
            "find_all_orders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("page", i64::from(req.page)),
                KeyValue::new("page_size", i64::from(req.page_size)),
            ],
        );

        let result = self.query.find_all(req).await.map_err(ServiceError::from);

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Get, &result, "Orders listed");
        result
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Order, ServiceError> {
        info!("🔍 Finding order {id}");

        let tracing_ctx = self.tracer.start_tracing(
            "find_order_by_id",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let result = match self.query.find_by_id(id).await {
            Ok(Some(order)) => Ok(order),
            Ok(None) => Err(not_found()),
            Err(e) => Err(ServiceError::from(e)),
        };

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Get, &result, "Order found");
        result
    }

    async fn find_by_number_and_email(
        &self,
        order_number: &str,
        email: &str,
    ) -> Result<Order, ServiceError> {
        info!("🔍 Tracking order {order_number}");

        let tracing_ctx = self.tracer.start_tracing(
            "track_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.number", order_number.to_string()),
            ],
        );

        let result = match self.query.find_by_number(order_number.trim()).await {
            Ok(Some(order)) if order.customer.email.eq_ignore_ascii_case(email.trim()) => {
                Ok(order)
            }
            Ok(_) => Err(not_found()),
            Err(e) => Err(ServiceError::from(e)),
        };

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Get, &result, "Order tracked");
        result
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Order>, ServiceError> {
        let tracing_ctx = self.tracer.start_tracing(
            "find_orders_by_customer",
            vec![KeyValue::new("component", "order")],
        );

        let result = self
            .query
            .find_by_customer(customer_id)
            .await
            .map_err(ServiceError::from);

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Get, &result, "Customer orders listed");
        result
    }
}
