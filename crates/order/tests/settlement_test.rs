mod common;

use chrono::Utc;
use common::{Parts, TestApp, flower_order, payment_event, sign};
use order::{
    abstract_trait::{
        lifecycle::{OrderLifecycleTrait, PaymentLifecycleTrait},
        order::{
            repository::OrderQueryRepositoryTrait, service::MockOrderCommandServiceTrait,
        },
    },
    domain::response::payment::SettlementOutcome,
    model::status::{OrderStatus, PaymentStatus},
    repository::MemoryStore,
};
use shared::{
    domain::Caller,
    errors::{RepositoryError, ServiceError},
};
use std::sync::Arc;
use testresult::TestResult;
use uuid::Uuid;

async fn pending_order(app: &TestApp) -> Result<Uuid, ServiceError> {
    let created = app
        .state
        .di_container
        .order_lifecycle
        .create_order(&Caller::Guest, &flower_order())
        .await?;
    Ok(created.data.order.order_id)
}

async fn stored_status(
    store: &MemoryStore,
    order_id: Uuid,
) -> Result<(OrderStatus, PaymentStatus), Box<dyn std::error::Error>> {
    let order = OrderQueryRepositoryTrait::find_by_id(store, order_id)
        .await?
        .ok_or("order should exist")?;
    Ok((order.status, order.payment_status))
}

#[tokio::test]
async fn replayed_success_settles_the_order_once() -> TestResult {
    let app = TestApp::new();
    let payments = &app.state.di_container.payment_lifecycle;
    let order_id = pending_order(&app).await?;
    let notifications_before = app.store.notifications().await.len();

    let payload = payment_event(
        "evt_1",
        "payment_intent.succeeded",
        order_id,
        Utc::now().timestamp(),
    );

    let first = payments.handle_webhook(&payload, &sign(&payload)).await?;
    assert_eq!(first.outcome, SettlementOutcome::Applied);
    assert!(first.received);

    let replay = payments.handle_webhook(&payload, &sign(&payload)).await?;
    assert_eq!(replay.outcome, SettlementOutcome::Duplicate);

    assert_eq!(
        stored_status(&app.store, order_id).await?,
        (OrderStatus::Processing, PaymentStatus::Paid)
    );
    assert_eq!(app.store.processed_events().await, 1);
    assert_eq!(app.store.notifications().await.len(), notifications_before);

    Ok(())
}

#[tokio::test]
async fn distinct_success_event_for_paid_order_is_already_applied() -> TestResult {
    let app = TestApp::new();
    let payments = &app.state.di_container.payment_lifecycle;
    let order_id = pending_order(&app).await?;
    let now = Utc::now().timestamp();

    let first = payment_event("evt_1", "payment_intent.succeeded", order_id, now);
    payments.handle_webhook(&first, &sign(&first)).await?;

    let second = payment_event("evt_2", "payment_intent.succeeded", order_id, now);
    let ack = payments.handle_webhook(&second, &sign(&second)).await?;

    assert_eq!(ack.outcome, SettlementOutcome::AlreadyApplied);
    assert_eq!(app.store.processed_events().await, 2);

    Ok(())
}

#[tokio::test]
async fn failure_after_success_keeps_the_order_processing() -> TestResult {
    let app = TestApp::new();
    let payments = &app.state.di_container.payment_lifecycle;
    let order_id = pending_order(&app).await?;
    let now = Utc::now().timestamp();

    let succeeded = payment_event("evt_1", "payment_intent.succeeded", order_id, now);
    payments.handle_webhook(&succeeded, &sign(&succeeded)).await?;

    let failed = payment_event("evt_2", "payment_intent.payment_failed", order_id, now);
    let ack = payments.handle_webhook(&failed, &sign(&failed)).await?;

    assert_eq!(ack.outcome, SettlementOutcome::Anomaly);
    assert_eq!(
        stored_status(&app.store, order_id).await?,
        (OrderStatus::Processing, PaymentStatus::Paid)
    );

    Ok(())
}

#[tokio::test]
async fn failed_payment_cancels_a_pending_order() -> TestResult {
    let app = TestApp::new();
    let payments = &app.state.di_container.payment_lifecycle;
    let order_id = pending_order(&app).await?;

    let payload = payment_event(
        "evt_1",
        "payment_intent.payment_failed",
        order_id,
        Utc::now().timestamp(),
    );
    let ack = payments.handle_webhook(&payload, &sign(&payload)).await?;

    assert_eq!(ack.outcome, SettlementOutcome::Applied);
    assert_eq!(
        stored_status(&app.store, order_id).await?,
        (OrderStatus::Cancelled, PaymentStatus::Failed)
    );

    Ok(())
}

#[tokio::test]
async fn tampered_payload_is_rejected_before_any_state_changes() -> TestResult {
    let app = TestApp::new();
    let payments = &app.state.di_container.payment_lifecycle;
    let order_id = pending_order(&app).await?;

    let payload = payment_event(
        "evt_1",
        "payment_intent.succeeded",
        order_id,
        Utc::now().timestamp(),
    );
    let signature = sign(&payload);
    let tampered = String::from_utf8(payload)?.replace("\"amount\":9300", "\"amount\":1");

    let result = payments
        .handle_webhook(tampered.as_bytes(), &signature)
        .await;

    assert!(matches!(result, Err(ServiceError::Signature(_))));
    assert_eq!(
        stored_status(&app.store, order_id).await?,
        (OrderStatus::Pending, PaymentStatus::Pending)
    );
    assert_eq!(app.store.processed_events().await, 0);

    Ok(())
}

#[tokio::test]
async fn unknown_order_is_acknowledged_and_recorded() -> TestResult {
    let app = TestApp::new();
    let payments = &app.state.di_container.payment_lifecycle;

    let payload = payment_event(
        "evt_1",
        "payment_intent.succeeded",
        Uuid::new_v4(),
        Utc::now().timestamp(),
    );
    let ack = payments.handle_webhook(&payload, &sign(&payload)).await?;

    assert_eq!(ack.outcome, SettlementOutcome::UnknownOrder);
    assert_eq!(app.store.processed_events().await, 1);

    Ok(())
}

#[tokio::test]
async fn event_older_than_the_last_status_change_is_stale() -> TestResult {
    let app = TestApp::new();
    let payments = &app.state.di_container.payment_lifecycle;
    let order_id = pending_order(&app).await?;

    let payload = payment_event(
        "evt_old",
        "payment_intent.payment_failed",
        order_id,
        Utc::now().timestamp() - 3600,
    );
    let ack = payments.handle_webhook(&payload, &sign(&payload)).await?;

    assert_eq!(ack.outcome, SettlementOutcome::Stale);
    assert_eq!(
        stored_status(&app.store, order_id).await?,
        (OrderStatus::Pending, PaymentStatus::Pending)
    );

    Ok(())
}

#[tokio::test]
async fn unrelated_event_types_are_ignored() -> TestResult {
    let app = TestApp::new();
    let payments = &app.state.di_container.payment_lifecycle;
    let order_id = pending_order(&app).await?;

    let payload = payment_event(
        "evt_1",
        "charge.refunded",
        order_id,
        Utc::now().timestamp(),
    );
    let ack = payments.handle_webhook(&payload, &sign(&payload)).await?;

    assert_eq!(ack.outcome, SettlementOutcome::Ignored);
    assert_eq!(
        stored_status(&app.store, order_id).await?,
        (OrderStatus::Pending, PaymentStatus::Pending)
    );

    Ok(())
}

#[tokio::test]
async fn persistence_failure_leaves_the_event_for_redelivery() -> TestResult {
    let store = MemoryStore::new();
    let order_id = Parts::new(&store)
        .build()
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order
        .order_id;

    let mut parts = Parts::new(&store);
    let mut order_command = MockOrderCommandServiceTrait::new();
    order_command.expect_update_order().returning(|_, _| {
        Err(ServiceError::Repo(RepositoryError::Custom(
            "connection reset".into(),
        )))
    });
    parts.order_command = Arc::new(order_command);
    let broken = parts.build();

    let payload = payment_event(
        "evt_1",
        "payment_intent.succeeded",
        order_id,
        Utc::now().timestamp(),
    );

    let result = broken.handle_webhook(&payload, &sign(&payload)).await;
    assert!(matches!(result, Err(ServiceError::Repo(_))));
    assert_eq!(store.processed_events().await, 0);

    let redelivered = Parts::new(&store)
        .build()
        .handle_webhook(&payload, &sign(&payload))
        .await?;
    assert_eq!(redelivered.outcome, SettlementOutcome::Applied);
    assert_eq!(store.processed_events().await, 1);

    Ok(())
}
