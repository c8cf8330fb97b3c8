use serde::{Deserialize, Serialize};
use shared::errors::ServiceError;
use std::fmt;
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Result of a legal status move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Unchanged,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        if self.is_terminal() {
            return false;
        }

        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Shipped)
                | (Shipped, Delivered)
                | (_, Cancelled)
        )
    }

    /// Re-applying the current status is accepted as a no-op, even in a
    /// terminal state.
    pub fn transition(&self, next: OrderStatus) -> Result<Transition, ServiceError> {
        if *self == next {
            return Ok(Transition::Unchanged);
        }

        if self.can_transition_to(next) {
            Ok(Transition::Applied)
        } else {
            Err(ServiceError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        };
        f.write_str(value)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Payment status an order takes when its invoice moves to `self`.
    pub fn order_payment_status(&self) -> Option<PaymentStatus> {
        match self {
            InvoiceStatus::Draft => None,
            InvoiceStatus::Paid => Some(PaymentStatus::Paid),
            InvoiceStatus::Cancelled => Some(PaymentStatus::Failed),
            InvoiceStatus::Overdue => Some(PaymentStatus::Pending),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        };
        f.write_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    const ALL: [OrderStatus; 5] = [Pending, Processing, Shipped, Delivered, Cancelled];

    #[test]
    fn forward_path_is_legal() {
        assert_eq!(Pending.transition(Processing).ok(), Some(Transition::Applied));
        assert_eq!(Processing.transition(Shipped).ok(), Some(Transition::Applied));
        assert_eq!(Shipped.transition(Delivered).ok(), Some(Transition::Applied));
    }

    #[test]
    fn every_non_terminal_state_can_be_cancelled() {
        for from in [Pending, Processing, Shipped] {
            assert_eq!(from.transition(Cancelled).ok(), Some(Transition::Applied));
        }
    }

    #[test]
    fn same_state_is_a_no_op_everywhere() {
        for status in ALL {
            assert_eq!(status.transition(status).ok(), Some(Transition::Unchanged));
        }
    }

    #[test]
    fn terminal_states_reject_every_other_status() {
        for terminal in [Delivered, Cancelled] {
            for next in ALL.into_iter().filter(|next| *next != terminal) {
                assert!(
                    matches!(
                        terminal.transition(next),
                        Err(ServiceError::InvalidTransition { .. })
                    ),
                    "{terminal} -> {next} should be rejected"
                );
            }
        }
    }

    #[test]
    fn skipping_or_regressing_is_rejected() {
        assert!(Pending.transition(Shipped).is_err());
        assert!(Pending.transition(Delivered).is_err());
        assert!(Processing.transition(Pending).is_err());
        assert!(Shipped.transition(Processing).is_err());
    }

    #[test]
    fn invoice_status_maps_to_order_payment_status() {
        assert_eq!(InvoiceStatus::Paid.order_payment_status(), Some(PaymentStatus::Paid));
        assert_eq!(
            InvoiceStatus::Cancelled.order_payment_status(),
            Some(PaymentStatus::Failed)
        );
        assert_eq!(
            InvoiceStatus::Overdue.order_payment_status(),
            Some(PaymentStatus::Pending)
        );
        assert_eq!(InvoiceStatus::Draft.order_payment_status(), None);
    }
}
