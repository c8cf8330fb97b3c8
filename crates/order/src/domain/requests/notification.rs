use crate::model::notification::Channel;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub channel: Channel,
    pub destination: String,
    pub subject: String,
    pub body: String,
    pub order_id: Option<Uuid>,
}
