use crate::{
    abstract_trait::lifecycle::PaymentLifecycleTrait,
    domain::{
        requests::{order::UpdateOrderRequest, payment::CreatePaymentIntentRequest},
        response::payment::{PaymentIntentResponse, SettlementOutcome, WebhookAck},
    },
    model::{
        payment_event::{PaymentEvent, PaymentEventType, ProcessedPaymentEvent, Settlement, settle},
        status::PaymentStatus,
    },
    service::lifecycle::OrderLifecycleOrchestrator,
};
use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{Identity, responses::ApiResponse},
    errors::ServiceError,
};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

impl OrderLifecycleOrchestrator {
    async fn settle_event(
        &self,
        event: &PaymentEvent,
    ) -> Result<(SettlementOutcome, Option<Uuid>), ServiceError> {
        if let PaymentEventType::Other(kind) = &event.kind {
            info!("ℹ️ Ignoring payment event {} of type {kind}", event.event_id);
            return Ok((SettlementOutcome::Ignored, None));
        }

        let Some(order_id) = event
            .order_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok())
        else {
            warn!(
                "⚠️ Payment event {} carries no usable order id ({:?})",
                event.event_id, event.order_id
            );
            return Ok((SettlementOutcome::UnknownOrder, None));
        };

        let order = match self.order_query.find_by_id(order_id).await {
            Ok(order) => order,
            Err(e) if e.is_not_found() => {
                warn!(
                    "⚠️ Payment event {} references unknown order {order_id}",
                    event.event_id
                );
                return Ok((SettlementOutcome::UnknownOrder, Some(order_id)));
            }
            Err(e) => return Err(e),
        };

        if let Some(amount) = event.amount.filter(|amount| *amount != order.totals.total) {
            warn!(
                "⚠️ Payment event {} amount {amount} differs from order {} total {}",
                event.event_id, order.order_number, order.totals.total
            );
        }

        let outcome = match settle(&order, event) {
            Settlement::Apply {
                status,
                payment_status,
            } => {
                let patch = UpdateOrderRequest {
                    status,
                    payment_status: Some(payment_status),
                    ..Default::default()
                };

                match self.order_command.update_order(order_id, &patch).await {
                    Ok(updated) => {
                        info!(
                            "💳 Order {} is now {} / {}",
                            updated.order_number, updated.status, updated.payment_status
                        );
                        SettlementOutcome::Applied
                    }
                    Err(ServiceError::InvalidTransition { from, to }) => {
                        warn!(
                            "⚠️ Payment event {} would move order {} from {from} to {to}",
                            event.event_id, order.order_number
                        );
                        SettlementOutcome::Anomaly
                    }
                    Err(e) => return Err(e),
                }
            }
            Settlement::AlreadyApplied => {
                info!(
                    "ℹ️ Payment event {} already reflected on order {}",
                    event.event_id, order.order_number
                );
                SettlementOutcome::AlreadyApplied
            }
            Settlement::Stale => {
                warn!(
                    "⚠️ Payment event {} predates the last status change of order {}",
                    event.event_id, order.order_number
                );
                SettlementOutcome::Stale
            }
            Settlement::Anomaly(reason) => {
                warn!("⚠️ Payment anomaly on event {}: {reason}", event.event_id);
                SettlementOutcome::Anomaly
            }
            Settlement::Ignore => SettlementOutcome::Ignored,
        };

        Ok((outcome, Some(order_id)))
    }
}

#[async_trait]
impl PaymentLifecycleTrait for OrderLifecycleOrchestrator {
    async fn create_payment_intent(
        &self,
        identity: &Identity,
        req: &CreatePaymentIntentRequest,
    ) -> Result<ApiResponse<PaymentIntentResponse>, ServiceError> {
        let order = self.order_query.find_by_id(req.order_id).await?;
        identity.ensure_owner_or_admin(order.customer_id())?;

        if order.payment_status == PaymentStatus::Paid {
            return Err(ServiceError::validation(format!(
                "Order {} is already paid",
                order.order_number
            )));
        }
        if order.status.is_terminal() {
            return Err(ServiceError::validation(format!(
                "Order {} is {}",
                order.order_number, order.status
            )));
        }

        let metadata = HashMap::from([
            ("order_id".to_string(), order.order_id.to_string()),
            ("order_number".to_string(), order.order_number.clone()),
        ]);

        let intent = self
            .gateway
            .create_payment_intent(order.totals.total, &self.currency, &metadata)
            .await?;

        info!(
            "💳 Payment intent {} created for order {}",
            intent.intent_id, order.order_number
        );

        Ok(ApiResponse::success(
            "Payment intent created successfully",
            PaymentIntentResponse {
                order_id: order.order_id,
                intent_id: intent.intent_id,
                client_secret: intent.client_secret,
                amount: intent.amount,
                currency: intent.currency,
            },
        ))
    }

    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookAck, ServiceError> {
        let event = self
            .gateway
            .verify_and_parse_webhook(payload, signature_header)?;

        info!(
            "📥 Payment event {} ({})",
            event.event_id,
            event.kind.as_str()
        );

        if self.payment_events.is_processed(&event.event_id).await? {
            info!("ℹ️ Payment event {} was already processed", event.event_id);
            return Ok(WebhookAck {
                received: true,
                event_id: event.event_id,
                outcome: SettlementOutcome::Duplicate,
            });
        }

        let (outcome, order_id) = self.settle_event(&event).await?;

        self.payment_events
            .record_processed(&ProcessedPaymentEvent {
                event_id: event.event_id.clone(),
                event_type: event.kind.as_str().to_string(),
                order_id,
                processed_at: Utc::now(),
            })
            .await?;

        Ok(WebhookAck {
            received: true,
            event_id: event.event_id,
            outcome,
        })
    }
}
