use crate::model::{
    order::Order,
    status::{OrderStatus, PaymentStatus},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentEventType {
    Succeeded,
    Failed,
    Other(String),
}

impl PaymentEventType {
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "payment_intent.succeeded" => PaymentEventType::Succeeded,
            "payment_intent.payment_failed" => PaymentEventType::Failed,
            other => PaymentEventType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentEventType::Succeeded => "succeeded",
            PaymentEventType::Failed => "failed",
            PaymentEventType::Other(raw) => raw,
        }
    }
}

/// Verified inbound payment-provider event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentEvent {
    pub event_id: String,
    pub kind: PaymentEventType,
    pub order_id: Option<String>,
    pub created: DateTime<Utc>,
    pub amount: Option<i64>,
}

/// Ledger row written once an event has been fully processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProcessedPaymentEvent {
    pub event_id: String,
    pub event_type: String,
    pub order_id: Option<Uuid>,
    pub processed_at: DateTime<Utc>,
}

/// What a payment event means for the order it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Apply {
        status: Option<OrderStatus>,
        payment_status: PaymentStatus,
    },
    AlreadyApplied,
    Stale,
    Anomaly(String),
    Ignore,
}

pub fn settle(order: &Order, event: &PaymentEvent) -> Settlement {
    let decision = match &event.kind {
        PaymentEventType::Other(_) => return Settlement::Ignore,
        PaymentEventType::Succeeded => settle_succeeded(order),
        PaymentEventType::Failed => settle_failed(order),
    };

    // An admin decision made after the event was emitted wins.
    let changes_status = matches!(
        &decision,
        Settlement::Apply { status: Some(next), .. } if *next != order.status
    );

    // Provider timestamps have whole-second precision.
    if changes_status && order.status_updated_at.timestamp() > event.created.timestamp() {
        return Settlement::Stale;
    }

    decision
}

fn settle_succeeded(order: &Order) -> Settlement {
    match (order.status, order.payment_status) {
        (OrderStatus::Cancelled, _) => Settlement::Anomaly(format!(
            "payment succeeded for cancelled order {}",
            order.order_number
        )),
        (OrderStatus::Pending, _) => Settlement::Apply {
            status: Some(OrderStatus::Processing),
            payment_status: PaymentStatus::Paid,
        },
        (_, PaymentStatus::Paid) => Settlement::AlreadyApplied,
        _ => Settlement::Apply {
            status: None,
            payment_status: PaymentStatus::Paid,
        },
    }
}

fn settle_failed(order: &Order) -> Settlement {
    match (order.status, order.payment_status) {
        (OrderStatus::Pending, _) => Settlement::Apply {
            status: Some(OrderStatus::Cancelled),
            payment_status: PaymentStatus::Failed,
        },
        (OrderStatus::Cancelled, PaymentStatus::Failed) => Settlement::AlreadyApplied,
        (OrderStatus::Cancelled, PaymentStatus::Pending) => Settlement::Apply {
            status: None,
            payment_status: PaymentStatus::Failed,
        },
        (status, _) => Settlement::Anomaly(format!(
            "payment failed for order {} already {status}",
            order.order_number
        )),
    }
}
