use crate::model::{
    order::{Customer, Totals},
    status::InvoiceStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub line_total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub order_id: Uuid,
    pub order_number: String,
    #[sqlx(json)]
    pub customer: Customer,
    #[sqlx(json)]
    pub items: Vec<InvoiceLine>,
    #[sqlx(flatten)]
    pub totals: Totals,
    pub status: InvoiceStatus,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn customer_id(&self) -> Option<&str> {
        self.customer.id.as_deref()
    }
}
