use crate::{
    domain::response::invoice::InvoiceDocument, model::invoice::Invoice,
    service::notification::format_amount,
};
use askama::Template;
use shared::errors::ServiceError;
use tracing::error;

struct LineView<'a> {
    name: &'a str,
    quantity: i32,
    unit_price: String,
    line_total: String,
}

#[derive(Template)]
#[template(path = "invoice.html")]
struct InvoiceTemplate<'a> {
    invoice_number: &'a str,
    order_number: &'a str,
    status: String,
    issued: String,
    due: String,
    customer_name: &'a str,
    customer_email: &'a str,
    lines: Vec<LineView<'a>>,
    subtotal: String,
    tax: String,
    shipping: String,
    discount: String,
    total: String,
    notes: Option<&'a str>,
}

impl<'a> From<&'a Invoice> for InvoiceTemplate<'a> {
    fn from(invoice: &'a Invoice) -> Self {
        InvoiceTemplate {
            invoice_number: &invoice.invoice_number,
            order_number: &invoice.order_number,
            status: invoice.status.to_string(),
            issued: invoice.created_at.format("%Y-%m-%d").to_string(),
            due: invoice.due_date.format("%Y-%m-%d").to_string(),
            customer_name: &invoice.customer.name,
            customer_email: &invoice.customer.email,
            lines: invoice
                .items
                .iter()
                .map(|line| LineView {
                    name: &line.name,
                    quantity: line.quantity,
                    unit_price: format_amount(line.unit_price),
                    line_total: format_amount(line.line_total),
                })
                .collect(),
            subtotal: format_amount(invoice.totals.subtotal),
            tax: format_amount(invoice.totals.tax),
            shipping: format_amount(invoice.totals.shipping),
            discount: format_amount(invoice.totals.discount),
            total: format_amount(invoice.totals.total),
            notes: invoice.notes.as_deref(),
        }
    }
}

/// Printable HTML rendition of an invoice.
pub fn render_document(invoice: &Invoice) -> Result<InvoiceDocument, ServiceError> {
    let html = InvoiceTemplate::from(invoice).render().map_err(|e| {
        error!(
            "❌ Failed to render invoice {}: {}",
            invoice.invoice_number, e
        );
        ServiceError::Internal(format!("Failed to render invoice: {e}"))
    })?;

    Ok(InvoiceDocument {
        file_name: format!("{}.html", invoice.invoice_number),
        content_type: "text/html; charset=utf-8",
        bytes: html.into_bytes(),
    })
}
