use crate::model::status::{OrderStatus, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
}

impl OrderItem {
    pub fn line_total(&self) -> Option<i64> {
        self.unit_price.checked_mul(i64::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Address {
    #[validate(length(min = 1, message = "line1 is required"))]
    pub line1: String,
    pub line2: Option<String>,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    pub state: Option<String>,
    #[validate(length(min = 1, message = "postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "country is required"))]
    pub country: String,
}

/// Monetary breakdown in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Totals {
    pub subtotal: i64,
    pub tax: i64,
    pub shipping: i64,
    pub discount: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: Uuid,
    pub order_number: String,
    #[sqlx(json)]
    pub customer: Customer,
    #[sqlx(json)]
    pub items: Vec<OrderItem>,
    #[sqlx(flatten)]
    pub totals: Totals,
    #[sqlx(json)]
    pub shipping_address: Address,
    #[sqlx(json(nullable))]
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

impl Order {
    pub fn customer_id(&self) -> Option<&str> {
        self.customer.id.as_deref()
    }
}
