use crate::{
    abstract_trait::invoice::{
        repository::DynInvoiceQueryRepository, service::InvoiceQueryServiceTrait,
    },
    domain::requests::invoice::FindAllInvoices,
    model::invoice::Invoice,
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
pub struct InvoiceQueryService {
    query: DynInvoiceQueryRepository,
    tracer: ServiceTracer,
}

pub struct InvoiceQueryServiceDeps {
    pub query: DynInvoiceQueryRepository,
}

impl InvoiceQueryService {
    pub fn new(deps: InvoiceQueryServiceDeps, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "invoice_query_service", "InvoiceQueryService");

        Self {
            query: deps.query,
            tracer: ServiceTracer::new("invoice-query-service", metrics),
        }
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Invoice not found".into())
}

#[async_trait]
impl InvoiceQueryServiceTrait for InvoiceQueryService {
    async fn find_all(&self, req: &FindAllInvoices) -> Result<(Vec<Invoice>, i64), ServiceError> {
        let tracing_ctx = self.tracer.start_tracing(
            "find_all_invoices",
            vec![
                KeyValue::new("component", "invoice"),
                KeyValue::new("page", i64::from(req.page)),
                KeyValue::new("page_size", i64::from(req.page_size)),
            ],
        );

        let result = self.query.find_all(req).await.map_err(ServiceError::from);

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Get, &result, "Invoices listed");
        result
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Invoice, ServiceError> {
        info!("🔍 Finding invoice {id}");

        let tracing_ctx = self.tracer.start_tracing(
            "find_invoice_by_id",
            vec![
                KeyValue::new("component", "invoice"),
                KeyValue::new("invoice.id", id.to_string()),
            ],
        );

        let result = match self.query.find_by_id(id).await {
            Ok(Some(invoice)) => Ok(invoice),
            Ok(None) => Err(not_found()),
            Err(e) => Err(ServiceError::from(e)),
        };

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Get, &result, "Invoice found");
        result
    }

    async fn find_by_order_id(&self, order_id: Uuid) -> Result<Invoice, ServiceError> {
        info!("🔍 Finding invoice for order {order_id}");

        let tracing_ctx = self.tracer.start_tracing(
            "find_invoice_by_order",
            vec![
                KeyValue::new("component", "invoice"),
                KeyValue::new("order.id", order_id.to_string()),
            ],
        );

        let result = match self.query.find_by_order_id(order_id).await {
            Ok(Some(invoice)) => Ok(invoice),
            Ok(None) => Err(not_found()),
            Err(e) => Err(ServiceError::from(e)),
        };

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Get, &result, "Invoice found");
        result
    }

    async fn find_by_customer(&self, customer_id: &str) -> Result<Vec<Invoice>, ServiceError> {
        let tracing_ctx = self.tracer.start_tracing(
            "find_invoices_by_customer",
            vec![KeyValue::new("component", "invoice")],
        );

        let result = self
            .query
            .find_by_customer(customer_id)
            .await
            .map_err(ServiceError::from);

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Get, &result, "Customer invoices listed");
        result
    }
}
