use crate::model::{
    order::{Address, Customer, OrderItem, Totals},
    status::{OrderStatus, PaymentStatus},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomerRequest {
    #[validate(length(min = 1, message = "customer name is required"))]
    pub name: String,

    #[validate(email(message = "customer email is invalid"))]
    pub email: String,

    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOrderItemRequest {
    #[validate(length(min = 1, message = "product id is required"))]
    pub product_id: String,

    #[validate(length(min = 1, message = "item name is required"))]
    pub name: String,

    #[validate(range(min = 0, message = "unit price must not be negative"))]
    pub unit_price: i64,

    #[validate(range(min = 1, message = "quantity must be positive"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateOrderRequest {
    #[validate(nested)]
    pub customer: CustomerRequest,

    #[validate(length(min = 1, message = "order must contain at least one item"), nested)]
    pub items: Vec<CreateOrderItemRequest>,

    #[validate(nested)]
    pub shipping_address: Address,

    #[validate(nested)]
    pub billing_address: Option<Address>,

    #[serde(default)]
    #[validate(range(min = 0, message = "tax must not be negative"))]
    pub tax: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "shipping must not be negative"))]
    pub shipping: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "discount must not be negative"))]
    pub discount: i64,

    /// Client-computed total; rejected when it disagrees with the server.
    pub total: Option<i64>,

    pub notes: Option<String>,
}

/// Admin patch. Totals and line items are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[validate(length(min = 1, max = 255))]
    pub tracking_number: Option<String>,
    pub invoice_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    #[validate(length(min = 1, max = 255))]
    pub tracking_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, IntoParams)]
pub struct TrackOrderQuery {
    #[validate(length(min = 1))]
    pub order_number: String,

    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
pub struct FindAllOrders {
    #[serde(default)]
    pub search: String,

    pub status: Option<OrderStatus>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: i32,
}

pub(crate) fn default_page() -> i32 {
    1
}

pub(crate) fn default_page_size() -> i32 {
    10
}

/// Fields the order store writes when creating an order.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRecordRequest {
    pub order_id: Uuid,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub totals: Totals,
    pub shipping_address: Address,
    pub billing_address: Option<Address>,
    pub notes: Option<String>,
    pub estimated_delivery: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Guarded update: applied only while the stored status still equals
/// `expected_status`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOrderRecordRequest {
    pub order_id: Uuid,
    pub expected_status: OrderStatus,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_number: Option<String>,
    pub invoice_id: Option<Uuid>,
    pub notes: Option<String>,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
