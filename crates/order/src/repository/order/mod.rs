mod command;
mod query;

pub use self::command::OrderCommandRepository;
pub use self::query::OrderQueryRepository;

pub(crate) const ORDER_COLUMNS: &str = r#"
    order_id, order_number, customer, items,
    subtotal, tax, shipping, discount, total,
    shipping_address, billing_address,
    status, payment_status, invoice_id, tracking_number, notes,
    estimated_delivery, status_updated_at, created_at, updated_at
"#;
