use crate::{
    abstract_trait::{
        invoice::{
            repository::{DynInvoiceCommandRepository, DynInvoiceQueryRepository},
            service::InvoiceCommandServiceTrait,
        },
        notification::DynNotificationService,
    },
    domain::{
        requests::{invoice::CreateInvoiceRecordRequest, notification::NotificationRequest},
        response::notification::NotificationResult,
    },
    model::{
        invoice::{Invoice, InvoiceLine},
        notification::Channel,
        order::Order,
        status::InvoiceStatus,
    },
    service::notification::format_amount,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, ServiceTracer, generate_random_string},
};
use tracing::{info, warn};
use uuid::Uuid;

const INVOICE_NUMBER_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct InvoiceCommandService {
    command: DynInvoiceCommandRepository,
    query: DynInvoiceQueryRepository,
    notifications: DynNotificationService,
    due_days: i64,
    tracer: ServiceTracer,
}

pub struct InvoiceCommandServiceDeps {
    pub command: DynInvoiceCommandRepository,
    pub query: DynInvoiceQueryRepository,
    pub notifications: DynNotificationService,
    pub due_days: i64,
}

fn invoice_not_found(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound("Invoice not found".into()),
        other => ServiceError::Repo(other),
    }
}

fn invoice_lines(order: &Order) -> Result<Vec<InvoiceLine>, ServiceError> {
    order
        .items
        .iter()
        .map(|item| {
            let line_total = item.line_total().ok_or_else(|| {
                ServiceError::Internal(format!("line total overflow on {}", item.product_id))
            })?;
            Ok(InvoiceLine {
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total,
            })
        })
        .collect()
}

/// `INV-YYYYMMDD-XXXXXX`.
fn invoice_number(now: DateTime<Utc>) -> Result<String, ServiceError> {
    let suffix = generate_random_string(6)
        .map_err(|e| ServiceError::Internal(format!("invoice number suffix: {e}")))?;

    Ok(format!("INV-{}-{suffix}", now.format("%Y%m%d")))
}

impl InvoiceCommandService {
    pub fn new(deps: InvoiceCommandServiceDeps, registry: &mut Registry) -> Self {
        let InvoiceCommandServiceDeps {
            command,
            query,
            notifications,
            due_days,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(registry, "invoice_command_service", "InvoiceCommandService");

        Self {
            command,
            query,
            notifications,
            due_days,
            tracer: ServiceTracer::new("invoice-command-service", metrics),
        }
    }

    async fn create_snapshot(&self, order: &Order) -> Result<Invoice, ServiceError> {
        if let Some(existing) = self.query.find_by_order_id(order.order_id).await? {
            info!(
                "ℹ️ Order {} already has invoice {}",
                order.order_number, existing.invoice_number
            );
            return Ok(existing);
        }

        let now = Utc::now();
        let items = invoice_lines(order)?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            let record = CreateInvoiceRecordRequest {
                invoice_id: Uuid::new_v4(),
                invoice_number: invoice_number(now)?,
                order_id: order.order_id,
                order_number: order.order_number.clone(),
                customer: order.customer.clone(),
                items: items.clone(),
                totals: order.totals,
                due_date: now + Duration::days(self.due_days),
                notes: order.notes.clone(),
                created_at: now,
            };

            match self.command.create_invoice(&record).await {
                Err(RepositoryError::AlreadyExists(number)) if attempt < INVOICE_NUMBER_ATTEMPTS => {
                    warn!("⚠️ Invoice number {number} already taken, retrying");
                }
                result => return Ok(result?),
            }
        }
    }
}

#[async_trait]
impl InvoiceCommandServiceTrait for InvoiceCommandService {
    async fn generate_invoice(&self, order: &Order) -> Result<Invoice, ServiceError> {
        info!("🧾 Generating invoice for order {}", order.order_number);

        let tracing_ctx = self.tracer.start_tracing(
            "generate_invoice",
            vec![
                KeyValue::new("component", "invoice"),
                KeyValue::new("operation", "generate"),
                KeyValue::new("order.id", order.order_id.to_string()),
            ],
        );

        let result = self.create_snapshot(order).await;

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Post, &result, "Invoice generated");
        result
    }

    async fn update_invoice_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<Invoice, ServiceError> {
        info!("🔄 Moving invoice {id} to {status}");

        let tracing_ctx = self.tracer.start_tracing(
            "update_invoice_status",
            vec![
                KeyValue::new("component", "invoice"),
                KeyValue::new("operation", "update_status"),
                KeyValue::new("invoice.id", id.to_string()),
            ],
        );

        let result = self
            .command
            .update_status(id, status, Utc::now())
            .await
            .map_err(invoice_not_found);

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Put, &result, "Invoice status updated");
        result
    }

    async fn delete_invoice(&self, id: Uuid) -> Result<Invoice, ServiceError> {
        info!("🗑️ Deleting invoice {id}");

        let tracing_ctx = self.tracer.start_tracing(
            "delete_invoice",
            vec![
                KeyValue::new("component", "invoice"),
                KeyValue::new("operation", "delete"),
                KeyValue::new("invoice.id", id.to_string()),
            ],
        );

        let result = self
            .command
            .delete_invoice(id)
            .await
            .map_err(invoice_not_found);

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Delete, &result, "Invoice deleted");
        result
    }

    async fn send_invoice_email(
        &self,
        invoice: &Invoice,
        destination: &str,
        message: Option<String>,
    ) -> Result<NotificationResult, ServiceError> {
        info!(
            "📧 Sending invoice {} to {destination}",
            invoice.invoice_number
        );

        let tracing_ctx = self.tracer.start_tracing(
            "send_invoice_email",
            vec![
                KeyValue::new("component", "invoice"),
                KeyValue::new("operation", "send"),
                KeyValue::new("invoice.id", invoice.invoice_id.to_string()),
            ],
        );

        let mut body = String::new();
        if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
            body.push_str(message.trim());
            body.push_str("\n\n");
        }
        body.push_str(&format!(
            "Invoice {} for order {}: {} due by {}.",
            invoice.invoice_number,
            invoice.order_number,
            format_amount(invoice.totals.total),
            invoice.due_date.format("%Y-%m-%d")
        ));

        let delivery = self
            .notifications
            .send(&NotificationRequest {
                channel: Channel::Email,
                destination: destination.to_string(),
                subject: format!("Invoice {}", invoice.invoice_number),
                body,
                order_id: Some(invoice.order_id),
            })
            .await;

        let result = if delivery.is_sent() {
            Ok(delivery)
        } else {
            Err(ServiceError::Dependency(format!(
                "Invoice email was not delivered: {}",
                delivery.reason.as_deref().unwrap_or("unknown reason")
            )))
        };

        self.tracer
            .complete_tracing(&tracing_ctx, Method::Post, &result, "Invoice sent");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{
            invoice::repository::{MockInvoiceCommandRepositoryTrait, MockInvoiceQueryRepositoryTrait},
            notification::MockNotificationServiceTrait,
        },
        model::{
            order::{Address, Customer, OrderItem, Totals},
            status::{OrderStatus, PaymentStatus},
        },
    };
    use std::sync::Arc;

    fn order() -> Order {
        let now = Utc::now();
        Order {
            order_id: Uuid::new_v4(),
            order_number: "GF-1001".into(),
            customer: Customer {
                id: None,
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                phone: None,
            },
            items: vec![OrderItem {
                product_id: "flower-35".into(),
                name: "Flower 3.5g".into(),
                unit_price: 4000,
                quantity: 2,
            }],
            totals: Totals {
                subtotal: 8000,
                tax: 800,
                shipping: 500,
                discount: 0,
                total: 9300,
            },
            shipping_address: Address {
                line1: "1 Main St".into(),
                line2: None,
                city: "Springfield".into(),
                state: None,
                postal_code: "62701".into(),
                country: "US".into(),
            },
            billing_address: None,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            invoice_id: None,
            tracking_number: None,
            notes: None,
            estimated_delivery: now,
            status_updated_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn stored(req: &CreateInvoiceRecordRequest) -> Invoice {
        Invoice {
            invoice_id: req.invoice_id,
            invoice_number: req.invoice_number.clone(),
            order_id: req.order_id,
            order_number: req.order_number.clone(),
            customer: req.customer.clone(),
            items: req.items.clone(),
            totals: req.totals,
            status: InvoiceStatus::Draft,
            due_date: req.due_date,
            notes: req.notes.clone(),
            created_at: req.created_at,
            updated_at: req.created_at,
        }
    }

    fn service(command: MockInvoiceCommandRepositoryTrait) -> InvoiceCommandService {
        let mut query = MockInvoiceQueryRepositoryTrait::new();
        query.expect_find_by_order_id().returning(|_| Ok(None));

        InvoiceCommandService::new(
            InvoiceCommandServiceDeps {
                command: Arc::new(command),
                query: Arc::new(query),
                notifications: Arc::new(MockNotificationServiceTrait::new()),
                due_days: 30,
            },
            &mut Registry::default(),
        )
    }

    #[test]
    fn invoice_number_has_date_and_six_character_suffix() {
        let now = Utc::now();
        let number = invoice_number(now).unwrap();

        let prefix = format!("INV-{}-", now.format("%Y%m%d"));
        assert!(number.starts_with(&prefix), "{number}");

        let suffix = &number[prefix.len()..];
        assert_eq!(suffix.len(), 6);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[tokio::test]
    async fn taken_invoice_number_is_retried_with_a_fresh_one() {
        let mut command = MockInvoiceCommandRepositoryTrait::new();
        let mut calls = 0;
        command
            .expect_create_invoice()
            .times(2)
            .returning(move |req| {
                calls += 1;
                if calls == 1 {
                    Err(RepositoryError::AlreadyExists(req.invoice_number.clone()))
                } else {
                    Ok(stored(req))
                }
            });

        let order = order();
        let invoice = service(command).generate_invoice(&order).await.unwrap();

        assert_eq!(invoice.order_id, order.order_id);
        assert_eq!(invoice.totals.total, 9300);
        assert!(invoice.invoice_number.starts_with("INV-"));
    }

    #[tokio::test]
    async fn invoice_number_clashes_give_up_after_bounded_attempts() {
        let mut command = MockInvoiceCommandRepositoryTrait::new();
        command
            .expect_create_invoice()
            .times(INVOICE_NUMBER_ATTEMPTS)
            .returning(|req| Err(RepositoryError::AlreadyExists(req.invoice_number.clone())));

        let result = service(command).generate_invoice(&order()).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::AlreadyExists(_)))
        ));
    }
}
