use crate::{
    domain::response::step::StepOutcome,
    model::{
        order::{Address, Customer, Order, OrderItem, Totals},
        status::{OrderStatus, PaymentStatus},
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub totals: Totals,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub invoice_id: Option<Uuid>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub estimated_delivery: DateTime<Utc>,
    pub status_updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(value: Order) -> Self {
        OrderResponse {
            order_id: value.order_id,
            order_number: value.order_number,
            customer: value.customer,
            items: value.items,
            totals: value.totals,
            shipping_address: value.shipping_address,
            billing_address: value.billing_address,
            status: value.status,
            payment_status: value.payment_status,
            invoice_id: value.invoice_id,
            tracking_number: value.tracking_number,
            notes: value.notes,
            estimated_delivery: value.estimated_delivery,
            status_updated_at: value.status_updated_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Outcome of each best-effort step that follows order persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreationSteps {
    pub invoice: StepOutcome,
    pub invoice_link: StepOutcome,
    pub sms_notification: StepOutcome,
    pub email_notification: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order: OrderResponse,
    pub steps: CreationSteps,
}
