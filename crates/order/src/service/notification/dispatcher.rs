use crate::{
    abstract_trait::notification::{
        DynNotificationChannel, DynNotificationRepository, NotificationServiceTrait,
    },
    domain::{requests::notification::NotificationRequest, response::notification::NotificationResult},
    model::notification::{NotificationOutcome, NotificationRecord},
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::utils::{Method, Metrics, ServiceTracer};
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct NotificationDispatcherDeps {
    pub channels: Vec<DynNotificationChannel>,
    pub repository: DynNotificationRepository,
    pub timeout: Duration,
}

/// Routes each request to its channel and records every attempt.
#[derive(Clone)]
pub struct NotificationDispatcher {
    channels: Vec<DynNotificationChannel>,
    repository: DynNotificationRepository,
    timeout: Duration,
    tracer: ServiceTracer,
}

impl NotificationDispatcher {
    pub fn new(deps: NotificationDispatcherDeps, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "notification_service", "NotificationService");

        Self {
            channels: deps.channels,
            repository: deps.repository,
            timeout: deps.timeout,
            tracer: ServiceTracer::new("notification-service", metrics),
        }
    }

    async fn deliver(
        &self,
        req: &NotificationRequest,
    ) -> (NotificationOutcome, Option<String>, Option<String>) {
        let Some(channel) = self.channels.iter().find(|c| c.channel() == req.channel) else {
            return (
                NotificationOutcome::Skipped,
                None,
                Some(format!("{} channel is not configured", req.channel)),
            );
        };

        if !channel.is_enabled() {
            return (
                NotificationOutcome::Skipped,
                None,
                Some(format!("{} channel is disabled", req.channel)),
            );
        }

        if req.destination.trim().is_empty() {
            return (
                NotificationOutcome::Skipped,
                None,
                Some("no destination".into()),
            );
        }

        let delivery = channel.deliver(&req.destination, &req.subject, &req.body);

        match tokio::time::timeout(self.timeout, delivery).await {
            Ok(Ok(message_id)) => (NotificationOutcome::Sent, message_id, None),
            Ok(Err(e)) => (NotificationOutcome::Failed, None, Some(e.to_string())),
            Err(_) => (
                NotificationOutcome::Failed,
                None,
                Some(format!(
                    "{} delivery timed out after {}s",
                    req.channel,
                    self.timeout.as_secs_f64()
                )),
            ),
        }
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationDispatcher {
    async fn send(&self, req: &NotificationRequest) -> NotificationResult {
        let tracing_ctx = self.tracer.start_tracing(
            "send_notification",
            vec![
                KeyValue::new("component", "notification"),
                KeyValue::new("channel", req.channel.to_string()),
            ],
        );

        let (outcome, provider_id, reason) = self.deliver(req).await;
        let message_id = provider_id.unwrap_or_else(|| Uuid::new_v4().to_string());

        match outcome {
            NotificationOutcome::Sent => info!(
                "📨 {} notification {message_id} sent to {}",
                req.channel, req.destination
            ),
            NotificationOutcome::Skipped => warn!(
                "⚠️ {} notification skipped: {}",
                req.channel,
                reason.as_deref().unwrap_or_default()
            ),
            NotificationOutcome::Failed => error!(
                "❌ {} notification to {} failed: {}",
                req.channel,
                req.destination,
                reason.as_deref().unwrap_or_default()
            ),
        }

        let record = NotificationRecord {
            notification_id: message_id.clone(),
            channel: req.channel,
            destination: req.destination.clone(),
            body: req.body.clone(),
            order_id: req.order_id,
            outcome,
            diagnostic: reason.clone(),
            created_at: Utc::now(),
        };

        if let Err(e) = self.repository.create(&record).await {
            error!("❌ Failed to record notification {message_id}: {e}");
        }

        let traced: Result<(), String> = match outcome {
            NotificationOutcome::Failed => Err(reason.clone().unwrap_or_default()),
            _ => Ok(()),
        };
        self.tracer
            .complete_tracing(&tracing_ctx, Method::Post, &traced, "Notification handled");

        NotificationResult {
            channel: req.channel,
            outcome,
            message_id,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::notification::MockNotificationChannelTrait,
        model::notification::Channel, repository::MemoryStore,
    };
    use shared::errors::ServiceError;
    use std::sync::Arc;

    fn dispatcher(channel: MockNotificationChannelTrait, store: &MemoryStore) -> NotificationDispatcher {
        NotificationDispatcher::new(
            NotificationDispatcherDeps {
                channels: vec![Arc::new(channel)],
                repository: Arc::new(store.clone()),
                timeout: Duration::from_millis(50),
            },
            &mut Registry::default(),
        )
    }

    fn sms_request() -> NotificationRequest {
        NotificationRequest {
            channel: Channel::Sms,
            destination: "+15550100".into(),
            subject: "Order GF-1001 confirmed".into(),
            body: "Thanks!".into(),
            order_id: Some(Uuid::new_v4()),
        }
    }

    fn sms_channel(enabled: bool) -> MockNotificationChannelTrait {
        let mut channel = MockNotificationChannelTrait::new();
        channel.expect_channel().return_const(Channel::Sms);
        channel.expect_is_enabled().return_const(enabled);
        channel
    }

    #[tokio::test]
    async fn sent_delivery_keeps_provider_id() {
        let store = MemoryStore::new();
        let mut channel = sms_channel(true);
        channel
            .expect_deliver()
            .once()
            .withf(|dest, _, body| dest.to_string() == "+15550100" && body.to_string() == "Thanks!")
            .returning(|_, _, _| Ok(Some("SM123".into())));

        let result = dispatcher(channel, &store).send(&sms_request()).await;

        assert!(result.is_sent());
        assert_eq!(result.message_id, "SM123");
        let records = store.notifications().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].notification_id, "SM123");
    }

    #[tokio::test]
    async fn disabled_channel_is_skipped() {
        let store = MemoryStore::new();
        let mut channel = sms_channel(false);
        channel.expect_deliver().never();

        let result = dispatcher(channel, &store).send(&sms_request()).await;

        assert_eq!(result.outcome, NotificationOutcome::Skipped);
        assert!(!result.message_id.is_empty());
    }

    #[tokio::test]
    async fn provider_error_is_reported_not_raised() {
        let store = MemoryStore::new();
        let mut channel = sms_channel(true);
        channel
            .expect_deliver()
            .returning(|_, _, _| Err(ServiceError::Dependency("twilio 500".into())));

        let result = dispatcher(channel, &store).send(&sms_request()).await;

        assert_eq!(result.outcome, NotificationOutcome::Failed);
        assert!(result.reason.unwrap_or_default().contains("twilio 500"));
        assert_eq!(store.notifications().await[0].outcome, NotificationOutcome::Failed);
    }

    #[tokio::test]
    async fn missing_channel_is_skipped() {
        let store = MemoryStore::new();
        let channel = sms_channel(true);
        let mut req = sms_request();
        req.channel = Channel::Email;

        let result = dispatcher(channel, &store).send(&req).await;

        assert_eq!(result.outcome, NotificationOutcome::Skipped);
    }
}
