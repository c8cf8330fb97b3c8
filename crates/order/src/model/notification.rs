use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Sms,
    Email,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Sms => f.write_str("sms"),
            Channel::Email => f.write_str("email"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationOutcome {
    Sent,
    Skipped,
    Failed,
}

/// One delivery attempt. Keyed by the provider message id, or a local id
/// when the provider returned none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NotificationRecord {
    pub notification_id: String,
    pub channel: Channel,
    pub destination: String,
    pub body: String,
    pub order_id: Option<Uuid>,
    pub outcome: NotificationOutcome,
    pub diagnostic: Option<String>,
    pub created_at: DateTime<Utc>,
}
