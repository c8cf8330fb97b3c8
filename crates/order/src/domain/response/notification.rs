use crate::model::notification::{Channel, NotificationOutcome};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResult {
    pub channel: Channel,
    pub outcome: NotificationOutcome,
    pub message_id: String,
    pub reason: Option<String>,
}

impl NotificationResult {
    pub fn is_sent(&self) -> bool {
        self.outcome == NotificationOutcome::Sent
    }
}
