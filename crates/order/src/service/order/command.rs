use crate::{
    abstract_trait::order::{
        repository::{DynOrderCommandRepository, DynOrderQueryRepository},
        service::OrderCommandServiceTrait,
    },
    domain::requests::order::{
        CreateOrderRecordRequest, CreateOrderRequest, UpdateOrderRecordRequest, UpdateOrderRequest,
    },
    model::{
        order::{Customer, Order},
        status::{OrderStatus, Transition},
    },
    service::order::compute_totals,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, ServiceTracer},
};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderCommandService {
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    delivery_lead_days: i64,
    tracer: ServiceTracer,
}

pub struct OrderCommandServiceDeps {
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
    pub delivery_lead_days: i64,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            command,
            query,
            delivery_lead_days,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(registry, "order_command_service", "OrderCommandService");

        Self {
            command,
            query,
            delivery_lead_days,
            tracer: ServiceTracer::new("order-command-service", metrics),
        }
    }

    async fn load(&self, id: Uuid) -> Result<Order, ServiceError> {
        self.query
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".into()))
    }

    /// Merges the patch onto the stored order. A status change goes through
    /// the state machine and is written only if nobody moved the order first.
    async fn apply(
        &self,
        current: &Order,
        req: &UpdateOrderRequest,
    ) -> Result<(Order, Transition), ServiceError> {
        let transition = match req.status {
            Some(next) => current.status.transition(next)?,
            None => Transition::Unchanged,
        };

        let now = Utc::now();
        let status = match transition {
            Transition::Applied => req.status,
            Transition::Unchanged => None,
        };

        let record = UpdateOrderRecordRequest {
            order_id: current.order_id,
            expected_status: current.status,
            status,
            payment_status: req.payment_status,
            tracking_number: req.tracking_number.clone(),
            invoice_id: req.invoice_id,
            notes: req.notes.clone(),
            status_updated_at: status.map(|_| now),
            updated_at: now,
        };

        let updated = self.command.update_order(&record).await?;
        Ok((updated, transition))
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
        customer_id: Option<String>,
    ) -> Result<Order, ServiceError> {
        info!(
            "🏗️ Creating order for {} ({} items)",
            req.customer.email,
            req.items.len()
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "create_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "create"),
                KeyValue::new("order.items", req.items.len() as i64),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let (items, totals) = compute_totals(req)?;
            let now = Utc::now();

            let record = CreateOrderRecordRequest {
                order_id: Uuid::new_v4(),
                customer: Customer {
                    id: customer_id,
                    name: req.customer.name.clone(),
                    email: req.customer.email.clone(),
                    phone: req.customer.phone.clone(),
                },
                items,
                totals,
                shipping_address: req.shipping_address.clone(),
                billing_address: req.billing_address.clone(),
                notes: req.notes.clone(),
                estimated_delivery: now + Duration::days(self.delivery_lead_days),
                created_at: now,
            };

            Ok(self.command.create_order(&record).await?)
        }
        .await;

        self.tracer
            .complete_tracing(&tracing_ctx, method, &result, "Order created");
        result
    }

    async fn update_order(
        &self,
        id: Uuid,
        req: &UpdateOrderRequest,
    ) -> Result<Order, ServiceError> {
        info!("✏️ Updating order {id}");

        let method = Method::Patch;
        let tracing_ctx = self.tracer.start_tracing(
            "update_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "update"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let current = self.load(id).await?;
            let (updated, _) = self.apply(&current, req).await?;
            Ok(updated)
        }
        .await;

        self.tracer
            .complete_tracing(&tracing_ctx, method, &result, "Order updated");
        result
    }

    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<(Order, Transition), ServiceError> {
        info!("🔄 Moving order {id} to {status}");

        let method = Method::Put;
        let tracing_ctx = self.tracer.start_tracing(
            "update_order_status",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "update_status"),
                KeyValue::new("order.id", id.to_string()),
                KeyValue::new("order.status", status.as_str()),
            ],
        );

        let result: Result<_, ServiceError> = async {
            let current = self.load(id).await?;
            let transition = current.status.transition(status)?;

            if transition == Transition::Unchanged && tracking_number.is_none() {
                info!("ℹ️ Order {} already {status}", current.order_number);
                return Ok((current, transition));
            }

            let patch = UpdateOrderRequest {
                status: Some(status),
                tracking_number,
                ..Default::default()
            };
            self.apply(&current, &patch).await
        }
        .await;

        self.tracer
            .complete_tracing(&tracing_ctx, method, &result, "Order status updated");
        result
    }

    async fn unlink_invoice(&self, id: Uuid, invoice_id: Uuid) -> Result<(), ServiceError> {
        match self.command.clear_invoice(id, invoice_id).await? {
            Some(order) => info!(
                "🔗 Cleared invoice {invoice_id} from order {}",
                order.order_number
            ),
            None => warn!("⚠️ Order {id} was not linked to invoice {invoice_id}"),
        }
        Ok(())
    }
}
