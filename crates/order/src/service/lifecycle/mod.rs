mod invoice;
mod order;
mod payment;

use crate::{
    abstract_trait::{
        invoice::service::{DynInvoiceCommandService, DynInvoiceQueryService},
        notification::DynNotificationService,
        order::service::{DynOrderCommandService, DynOrderQueryService},
        payment::{DynPaymentEventRepository, DynPaymentGateway},
    },
    domain::{
        requests::{notification::NotificationRequest, order::UpdateOrderRequest},
        response::{notification::NotificationResult, step::StepOutcome},
    },
    model::{
        notification::Channel,
        order::Order,
        status::OrderStatus,
    },
    service::notification::{MessageKind, MessageTemplates, TemplateContext, render_template},
};
use shared::errors::ServiceError;
use tracing::{info, warn};
use uuid::Uuid;

pub struct OrderLifecycleDeps {
    pub order_command: DynOrderCommandService,
    pub order_query: DynOrderQueryService,
    pub invoice_command: DynInvoiceCommandService,
    pub invoice_query: DynInvoiceQueryService,
    pub notifications: DynNotificationService,
    pub gateway: DynPaymentGateway,
    pub payment_events: DynPaymentEventRepository,
    pub templates: MessageTemplates,
    pub tracking_url_base: String,
    pub currency: String,
}

/// Coordinates orders, invoices, payments and notifications. Only order
/// persistence is fatal; every later step is best-effort and reported.
#[derive(Clone)]
pub struct OrderLifecycleOrchestrator {
    order_command: DynOrderCommandService,
    order_query: DynOrderQueryService,
    invoice_command: DynInvoiceCommandService,
    invoice_query: DynInvoiceQueryService,
    notifications: DynNotificationService,
    gateway: DynPaymentGateway,
    payment_events: DynPaymentEventRepository,
    templates: MessageTemplates,
    tracking_url_base: String,
    currency: String,
}

impl OrderLifecycleOrchestrator {
    pub fn new(deps: OrderLifecycleDeps) -> Self {
        let OrderLifecycleDeps {
            order_command,
            order_query,
            invoice_command,
            invoice_query,
            notifications,
            gateway,
            payment_events,
            templates,
            tracking_url_base,
            currency,
        } = deps;

        Self {
            order_command,
            order_query,
            invoice_command,
            invoice_query,
            notifications,
            gateway,
            payment_events,
            templates,
            tracking_url_base,
            currency,
        }
    }

    async fn notify(&self, order: &Order, kind: MessageKind, channel: Channel) -> StepOutcome {
        let destination = match channel {
            Channel::Sms => order
                .customer
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|phone| !phone.is_empty()),
            Channel::Email => Some(order.customer.email.as_str()),
        };

        let Some(destination) = destination else {
            return StepOutcome::skipped("customer has no phone number");
        };

        let ctx = TemplateContext::from_order(order, &self.tracking_url_base);
        let result: NotificationResult = self
            .notifications
            .send(&NotificationRequest {
                channel,
                destination: destination.to_string(),
                subject: kind.subject(&order.order_number),
                body: render_template(self.templates.get(kind), &ctx),
                order_id: Some(order.order_id),
            })
            .await;

        StepOutcome::from(&result)
    }

    async fn notify_status_change(&self, order: &Order) {
        let kind = match order.status {
            OrderStatus::Shipped => MessageKind::OrderShipped,
            OrderStatus::Delivered => MessageKind::OrderDelivered,
            OrderStatus::Cancelled => MessageKind::OrderCancelled,
            OrderStatus::Pending | OrderStatus::Processing => return,
        };

        let sms = self.notify(order, kind, Channel::Sms).await;
        let email = self.notify(order, kind, Channel::Email).await;
        info!(
            "📣 Status notifications for {}: sms={:?} email={:?}",
            order.order_number, sms, email
        );
    }

    /// Points the order at its invoice. Failure leaves the invoice
    /// reachable by order id.
    async fn link_invoice(&self, order_id: Uuid, invoice_id: Uuid) -> Result<Order, ServiceError> {
        let patch = UpdateOrderRequest {
            invoice_id: Some(invoice_id),
            ..Default::default()
        };

        self.order_command
            .update_order(order_id, &patch)
            .await
            .inspect_err(|e| warn!("⚠️ Failed to link invoice {invoice_id} to order {order_id}: {e}"))
    }
}
