use crate::model::order::Order;

/// Minor units rendered as a decimal amount with two places.
pub fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    OrderConfirmation,
    OrderShipped,
    OrderDelivered,
    OrderCancelled,
}

impl MessageKind {
    pub fn subject(&self, order_number: &str) -> String {
        match self {
            MessageKind::OrderConfirmation => format!("Order {order_number} confirmed"),
            MessageKind::OrderShipped => format!("Order {order_number} has shipped"),
            MessageKind::OrderDelivered => format!("Order {order_number} was delivered"),
            MessageKind::OrderCancelled => format!("Order {order_number} was cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplates {
    pub order_confirmation: String,
    pub order_shipped: String,
    pub order_delivered: String,
    pub order_cancelled: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            order_confirmation: "Hi {customerName}, thanks for your order {orderId}. \
                Total: {total}. Estimated delivery: {estimatedDelivery}. Track it at {trackingUrl}"
                .into(),
            order_shipped: "Hi {customerName}, your order {orderId} has shipped. \
                Tracking number: {trackingNumber}. Track it at {trackingUrl}"
                .into(),
            order_delivered: "Hi {customerName}, your order {orderId} was delivered. Enjoy!".into(),
            order_cancelled: "Hi {customerName}, your order {orderId} was cancelled. \
                Contact us if you have any questions."
                .into(),
        }
    }
}

impl MessageTemplates {
    pub fn get(&self, kind: MessageKind) -> &str {
        match kind {
            MessageKind::OrderConfirmation => &self.order_confirmation,
            MessageKind::OrderShipped => &self.order_shipped,
            MessageKind::OrderDelivered => &self.order_delivered,
            MessageKind::OrderCancelled => &self.order_cancelled,
        }
    }
}

/// Values available to message templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    pub order_id: String,
    pub customer_name: String,
    pub total: String,
    pub tracking_number: String,
    pub estimated_delivery: String,
    pub tracking_url: String,
}

impl TemplateContext {
    pub fn from_order(order: &Order, tracking_url_base: &str) -> Self {
        Self {
            order_id: order.order_number.clone(),
            customer_name: order.customer.name.clone(),
            total: format_amount(order.totals.total),
            tracking_number: order.tracking_number.clone().unwrap_or_default(),
            estimated_delivery: order.estimated_delivery.format("%Y-%m-%d").to_string(),
            tracking_url: format!("{tracking_url_base}{}", order.order_number),
        }
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "orderId" => Some(&self.order_id),
            "customerName" => Some(&self.customer_name),
            "total" => Some(&self.total),
            "trackingNumber" => Some(&self.tracking_number),
            "estimatedDelivery" => Some(&self.estimated_delivery),
            "trackingUrl" => Some(&self.tracking_url),
            _ => None,
        }
    }
}

/// Replaces `{name}` placeholders. Unknown placeholders are kept verbatim.
pub fn render_template(template: &str, ctx: &TemplateContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        match after.find('}') {
            Some(end) => match ctx.lookup(&after[..end]) {
                Some(value) => {
                    out.push_str(value);
                    rest = &after[end + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            },
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
