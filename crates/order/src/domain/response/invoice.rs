use crate::{
    domain::response::step::StepOutcome,
    model::{
        invoice::{Invoice, InvoiceLine},
        order::{Customer, Totals},
        status::InvoiceStatus,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub order_id: Uuid,
    pub order_number: String,
    pub customer: Customer,
    pub items: Vec<InvoiceLine>,
    pub totals: Totals,
    pub status: InvoiceStatus,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(value: Invoice) -> Self {
        InvoiceResponse {
            invoice_id: value.invoice_id,
            invoice_number: value.invoice_number,
            order_id: value.order_id,
            order_number: value.order_number,
            customer: value.customer,
            items: value.items,
            totals: value.totals,
            status: value.status,
            due_date: value.due_date,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceStatusUpdateResponse {
    pub invoice: InvoiceResponse,
    pub order_sync: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedInvoiceResponse {
    pub invoice: InvoiceResponse,
    pub order_link: StepOutcome,
}

/// Rendered invoice served as a file download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
