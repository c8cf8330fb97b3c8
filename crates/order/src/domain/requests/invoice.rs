use crate::{
    domain::requests::order::{default_page, default_page_size},
    model::{
        invoice::InvoiceLine,
        order::{Customer, Totals},
        status::InvoiceStatus,
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, IntoParams)]
pub struct FindAllInvoices {
    #[serde(default)]
    pub search: String,

    pub status: Option<InvoiceStatus>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateInvoiceStatusRequest {
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendInvoiceRequest {
    /// Defaults to the customer email on the invoice.
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateInvoiceRecordRequest {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub order_id: Uuid,
    pub order_number: String,
    pub customer: Customer,
    pub items: Vec<InvoiceLine>,
    pub totals: Totals,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
