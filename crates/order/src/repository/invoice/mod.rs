mod command;
mod query;

pub use self::command::InvoiceCommandRepository;
pub use self::query::InvoiceQueryRepository;

pub(crate) const INVOICE_COLUMNS: &str = r#"
    invoice_id, invoice_number, order_id, order_number, customer, items,
    subtotal, tax, shipping, discount, total,
    status, due_date, notes, created_at, updated_at
"#;
