mod common;

use common::{
    Parts, SlowChannel, TestApp, admin, customer, failing_channel, flower_order, sent_channel,
};
use order::{
    abstract_trait::{
        invoice::service::MockInvoiceCommandServiceTrait,
        lifecycle::{InvoiceLifecycleTrait, OrderLifecycleTrait, PaymentLifecycleTrait},
        notification::DynNotificationChannel,
        order::{
            repository::OrderQueryRepositoryTrait,
            service::{MockOrderCommandServiceTrait, OrderCommandServiceTrait},
        },
        payment::MockPaymentGatewayTrait,
    },
    domain::{
        requests::{
            invoice::{SendInvoiceRequest, UpdateInvoiceStatusRequest},
            order::{TrackOrderQuery, UpdateOrderRequest, UpdateOrderStatusRequest},
            payment::CreatePaymentIntentRequest,
        },
        response::{payment::PaymentIntent, step::StepOutcome},
    },
    model::{
        notification::{Channel, NotificationOutcome},
        order::Totals,
        status::{InvoiceStatus, OrderStatus, PaymentStatus},
    },
    repository::MemoryStore,
};
use shared::{
    domain::Caller,
    errors::{RepositoryError, ServiceError},
};
use std::{sync::Arc, time::Duration};
use testresult::TestResult;

#[tokio::test]
async fn order_and_invoice_share_the_computed_totals() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;
    let invoices = &app.state.di_container.invoice_lifecycle;

    let created = orders.create_order(&Caller::Guest, &flower_order()).await?;
    let order = created.data.order;

    let expected = Totals {
        subtotal: 8000,
        tax: 800,
        shipping: 500,
        discount: 0,
        total: 9300,
    };
    assert_eq!(order.totals, expected);
    assert_eq!(order.order_number, "GF-1001");
    assert_eq!(created.data.steps.invoice, StepOutcome::Ok);
    assert_eq!(created.data.steps.invoice_link, StepOutcome::Ok);
    assert_eq!(created.data.steps.sms_notification, StepOutcome::Ok);
    assert_eq!(created.data.steps.email_notification, StepOutcome::Ok);

    let confirmations = app.store.notifications().await;
    assert!(
        confirmations
            .iter()
            .all(|record| record.body.contains("Total: 93.00"))
    );

    orders
        .update_order(
            &admin(),
            order.order_id,
            &UpdateOrderRequest {
                notes: Some("leave at the door".into()),
                ..Default::default()
            },
        )
        .await?;

    let invoice = invoices
        .get_invoice_by_order(&admin(), order.order_id)
        .await?
        .data;

    assert_eq!(invoice.totals, expected);
    assert_eq!(order.invoice_id, Some(invoice.invoice_id));
    assert_eq!(invoice.items.len(), 1);
    assert_eq!(invoice.items[0].line_total, 8000);

    Ok(())
}

#[tokio::test]
async fn generating_an_invoice_twice_returns_the_same_number() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;
    let invoices = &app.state.di_container.invoice_lifecycle;

    let order = orders
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;

    let first = invoices.generate_invoice(&admin(), order.order_id).await?.data;
    let second = invoices.generate_invoice(&admin(), order.order_id).await?.data;

    assert_eq!(first.invoice.invoice_number, second.invoice.invoice_number);
    assert_eq!(first.invoice.invoice_id, second.invoice.invoice_id);
    assert_eq!(order.invoice_id, Some(first.invoice.invoice_id));
    assert_eq!(second.order_link, StepOutcome::Ok);

    Ok(())
}

#[tokio::test]
async fn creation_succeeds_when_invoice_and_notifications_fail() -> TestResult {
    let store = MemoryStore::new();
    let mut parts = Parts::with_channels(
        &store,
        vec![failing_channel(Channel::Sms), failing_channel(Channel::Email)],
        Duration::from_secs(5),
    );

    let mut invoice_command = MockInvoiceCommandServiceTrait::new();
    invoice_command
        .expect_generate_invoice()
        .returning(|_| Err(ServiceError::Dependency("invoice store unavailable".into())));
    parts.invoice_command = Arc::new(invoice_command);

    let orchestrator = parts.build();

    let created = orchestrator
        .create_order(&Caller::Guest, &flower_order())
        .await?;
    let steps = created.data.steps;

    assert!(matches!(steps.invoice, StepOutcome::Failed { .. }));
    assert!(matches!(steps.invoice_link, StepOutcome::Skipped { .. }));
    assert!(matches!(steps.sms_notification, StepOutcome::Failed { .. }));
    assert!(matches!(steps.email_notification, StepOutcome::Failed { .. }));

    let stored = OrderQueryRepositoryTrait::find_by_id(&store, created.data.order.order_id).await?;
    assert_eq!(stored.map(|order| order.totals.total), Some(9300));

    let attempts = store.notifications().await;
    assert_eq!(attempts.len(), 2);
    assert!(
        attempts
            .iter()
            .all(|record| record.outcome == NotificationOutcome::Failed)
    );

    Ok(())
}

#[tokio::test]
async fn slow_channel_is_reported_as_failed() -> TestResult {
    let store = MemoryStore::new();
    let slow: DynNotificationChannel = Arc::new(SlowChannel {
        channel: Channel::Sms,
        delay: Duration::from_millis(500),
    });
    let orchestrator = Parts::with_channels(
        &store,
        vec![slow, sent_channel(Channel::Email)],
        Duration::from_millis(50),
    )
    .build();

    let created = orchestrator
        .create_order(&Caller::Guest, &flower_order())
        .await?;

    match created.data.steps.sms_notification {
        StepOutcome::Failed { reason } => assert!(reason.contains("timed out"), "{reason}"),
        other => panic!("expected a failed SMS step, got {other:?}"),
    }
    assert_eq!(created.data.steps.email_notification, StepOutcome::Ok);

    Ok(())
}

#[tokio::test]
async fn customer_without_phone_skips_sms() -> TestResult {
    let app = TestApp::new();
    let mut req = flower_order();
    req.customer.phone = None;

    let created = app
        .state
        .di_container
        .order_lifecycle
        .create_order(&Caller::Guest, &req)
        .await?;

    assert!(matches!(
        created.data.steps.sms_notification,
        StepOutcome::Skipped { .. }
    ));
    assert_eq!(created.data.steps.email_notification, StepOutcome::Ok);

    Ok(())
}

#[tokio::test]
async fn authenticated_checkout_is_visible_to_its_customer_only() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;
    let owner = customer("user-7");

    let order = orders
        .create_order(&Caller::Authenticated(owner.clone()), &flower_order())
        .await?
        .data
        .order;

    assert_eq!(order.customer.id.as_deref(), Some("user-7"));
    assert_eq!(orders.find_my_orders(&owner).await?.data.len(), 1);
    assert!(orders.get_order(&owner, order.order_id).await.is_ok());

    let stranger = orders.get_order(&customer("user-8"), order.order_id).await;
    assert!(matches!(stranger, Err(ServiceError::Forbidden(_))));

    Ok(())
}

#[tokio::test]
async fn tracking_never_reveals_which_field_mismatched() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;

    let missing = orders
        .track_order(&TrackOrderQuery {
            order_number: "GF-1001".into(),
            email: "a@b.com".into(),
        })
        .await;
    let missing_message = match missing {
        Err(ServiceError::NotFound(message)) => message,
        other => panic!("expected not found, got {other:?}"),
    };

    orders.create_order(&Caller::Guest, &flower_order()).await?;

    let wrong_email = orders
        .track_order(&TrackOrderQuery {
            order_number: "GF-1001".into(),
            email: "a@b.com".into(),
        })
        .await;
    match wrong_email {
        Err(ServiceError::NotFound(message)) => assert_eq!(message, missing_message),
        other => panic!("expected not found, got {other:?}"),
    }

    let found = orders
        .track_order(&TrackOrderQuery {
            order_number: "GF-1001".into(),
            email: "ADA@example.com".into(),
        })
        .await?;
    assert_eq!(found.data.order_number, "GF-1001");

    Ok(())
}

#[tokio::test]
async fn terminal_orders_reject_further_status_moves() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;

    let order = orders
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;

    let cancel = UpdateOrderStatusRequest {
        status: OrderStatus::Cancelled,
        tracking_number: None,
    };
    orders
        .update_order_status(&admin(), order.order_id, &cancel)
        .await?;

    for status in [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
    ] {
        let result = orders
            .update_order_status(
                &admin(),
                order.order_id,
                &UpdateOrderStatusRequest {
                    status,
                    tracking_number: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(ServiceError::InvalidTransition { .. })),
            "{status} should be rejected"
        );
    }

    let again = orders
        .update_order_status(&admin(), order.order_id, &cancel)
        .await?;
    assert_eq!(again.message, "Order status unchanged");
    assert_eq!(again.data.status, OrderStatus::Cancelled);

    Ok(())
}

#[tokio::test]
async fn shipping_an_order_notifies_the_customer() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;

    let order = orders
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;
    let after_create = app.store.notifications().await.len();

    orders
        .update_order_status(
            &admin(),
            order.order_id,
            &UpdateOrderStatusRequest {
                status: OrderStatus::Processing,
                tracking_number: None,
            },
        )
        .await?;
    assert_eq!(app.store.notifications().await.len(), after_create);

    let shipped = orders
        .update_order_status(
            &admin(),
            order.order_id,
            &UpdateOrderStatusRequest {
                status: OrderStatus::Shipped,
                tracking_number: Some("1Z999".into()),
            },
        )
        .await?;

    assert_eq!(shipped.data.tracking_number.as_deref(), Some("1Z999"));

    let records = app.store.notifications().await;
    assert_eq!(records.len(), after_create + 2);
    assert!(records.iter().any(|record| record.body.contains("1Z999")));

    Ok(())
}

#[tokio::test]
async fn non_admin_cannot_change_status() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;

    let order = orders
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;

    let result = orders
        .update_order_status(
            &customer("user-1"),
            order.order_id,
            &UpdateOrderStatusRequest {
                status: OrderStatus::Shipped,
                tracking_number: None,
            },
        )
        .await;

    assert!(matches!(result, Err(ServiceError::Forbidden(_))));

    Ok(())
}

#[tokio::test]
async fn invoice_status_drives_order_payment_status() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;
    let invoices = &app.state.di_container.invoice_lifecycle;

    let order = orders
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;
    let invoice_id = order.invoice_id.ok_or("order should be linked to its invoice")?;

    for (invoice_status, payment_status) in [
        (InvoiceStatus::Paid, PaymentStatus::Paid),
        (InvoiceStatus::Cancelled, PaymentStatus::Failed),
        (InvoiceStatus::Overdue, PaymentStatus::Pending),
    ] {
        let updated = invoices
            .update_invoice_status(
                &admin(),
                invoice_id,
                &UpdateInvoiceStatusRequest {
                    status: invoice_status,
                },
            )
            .await?
            .data;

        assert_eq!(updated.invoice.status, invoice_status);
        assert_eq!(updated.order_sync, StepOutcome::Ok);

        let current = orders.get_order(&admin(), order.order_id).await?.data;
        assert_eq!(current.payment_status, payment_status);
    }

    Ok(())
}

#[tokio::test]
async fn order_sync_failure_still_returns_the_updated_invoice() -> TestResult {
    let store = MemoryStore::new();
    let order = Parts::new(&store)
        .build()
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;
    let invoice_id = order.invoice_id.ok_or("order should be linked to its invoice")?;

    let mut parts = Parts::new(&store);
    let mut order_command = MockOrderCommandServiceTrait::new();
    order_command
        .expect_update_order()
        .returning(|_, _| Err(ServiceError::Repo(RepositoryError::Custom("write failed".into()))));
    parts.order_command = Arc::new(order_command);

    let updated = parts
        .build()
        .update_invoice_status(
            &admin(),
            invoice_id,
            &UpdateInvoiceStatusRequest {
                status: InvoiceStatus::Paid,
            },
        )
        .await?
        .data;

    assert_eq!(updated.invoice.status, InvoiceStatus::Paid);
    assert!(matches!(updated.order_sync, StepOutcome::Failed { .. }));

    let stored = OrderQueryRepositoryTrait::find_by_id(&store, order.order_id)
        .await?
        .ok_or("order should exist")?;
    assert_eq!(stored.payment_status, PaymentStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn deleting_an_invoice_unlinks_the_order() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;
    let invoices = &app.state.di_container.invoice_lifecycle;

    let order = orders
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;
    let invoice_id = order.invoice_id.ok_or("order should be linked to its invoice")?;

    invoices.delete_invoice(&admin(), invoice_id).await?;

    let stored = OrderQueryRepositoryTrait::find_by_id(&app.store, order.order_id)
        .await?
        .ok_or("order should exist")?;
    assert_eq!(stored.invoice_id, None);

    let lookup = invoices.get_invoice(&admin(), invoice_id).await;
    assert!(matches!(lookup, Err(ServiceError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn invoice_download_is_an_html_attachment() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;
    let invoices = &app.state.di_container.invoice_lifecycle;

    let owner = customer("user-3");
    let order = orders
        .create_order(&Caller::Authenticated(owner.clone()), &flower_order())
        .await?
        .data
        .order;
    let invoice_id = order.invoice_id.ok_or("order should be linked to its invoice")?;

    let document = invoices.download_invoice(&owner, invoice_id).await?;
    let html = String::from_utf8(document.bytes)?;

    assert!(document.file_name.ends_with(".html"));
    assert!(html.contains("Flower 3.5g"));
    assert!(html.contains(&order.order_number));

    let stranger = invoices.download_invoice(&customer("user-4"), invoice_id).await;
    assert!(matches!(stranger, Err(ServiceError::Forbidden(_))));

    Ok(())
}

#[tokio::test]
async fn reading_an_unlinked_order_relinks_its_invoice() -> TestResult {
    let store = MemoryStore::new();
    let parts = Parts::new(&store);
    let order_command = parts.order_command.clone();
    let orchestrator = parts.build();

    let order = orchestrator
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;
    let invoice_id = order.invoice_id.ok_or("order should be linked to its invoice")?;

    order_command.unlink_invoice(order.order_id, invoice_id).await?;

    let fetched = orchestrator.get_order(&admin(), order.order_id).await?.data;
    assert_eq!(fetched.invoice_id, Some(invoice_id));

    let stored = OrderQueryRepositoryTrait::find_by_id(&store, order.order_id)
        .await?
        .ok_or("order should exist")?;
    assert_eq!(stored.invoice_id, Some(invoice_id));

    Ok(())
}

#[tokio::test]
async fn sending_an_invoice_reports_the_delivery() -> TestResult {
    let app = TestApp::new();
    let orders = &app.state.di_container.order_lifecycle;
    let invoices = &app.state.di_container.invoice_lifecycle;

    let order = orders
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;
    let invoice_id = order.invoice_id.ok_or("order should be linked to its invoice")?;

    let request = SendInvoiceRequest {
        email: Some("billing@example.com".into()),
        message: Some("Thanks for your order".into()),
    };

    let sent = invoices.send_invoice(&admin(), invoice_id, &request).await?;
    assert_eq!(sent.data.channel, Channel::Email);
    assert_eq!(sent.data.outcome, NotificationOutcome::Sent);

    let by_customer = invoices
        .send_invoice(&customer("user-1"), invoice_id, &request)
        .await;
    assert!(matches!(by_customer, Err(ServiceError::Forbidden(_))));

    Ok(())
}

#[tokio::test]
async fn failed_invoice_email_is_a_dependency_error() -> TestResult {
    let store = MemoryStore::new();
    let orchestrator = Parts::with_channels(
        &store,
        vec![sent_channel(Channel::Sms), failing_channel(Channel::Email)],
        Duration::from_secs(5),
    )
    .build();

    let order = orchestrator
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;
    let invoice_id = order.invoice_id.ok_or("order should be linked to its invoice")?;

    let request = SendInvoiceRequest {
        email: None,
        message: None,
    };
    let result = orchestrator.send_invoice(&admin(), invoice_id, &request).await;

    assert!(matches!(result, Err(ServiceError::Dependency(_))));

    Ok(())
}

#[tokio::test]
async fn payment_intent_charges_the_stored_total() -> TestResult {
    let store = MemoryStore::new();
    let mut parts = Parts::new(&store);

    let mut gateway = MockPaymentGatewayTrait::new();
    gateway
        .expect_create_payment_intent()
        .withf(|amount, _, metadata| *amount == 9300 && metadata.contains_key("order_id"))
        .times(1)
        .returning(|amount, currency, _| {
            Ok(PaymentIntent {
                intent_id: "pi_123".into(),
                client_secret: "pi_123_secret".into(),
                amount,
                currency: currency.to_string(),
            })
        });
    parts.gateway = Arc::new(gateway);
    let orchestrator = parts.build();

    let owner = customer("user-9");
    let order = orchestrator
        .create_order(&Caller::Authenticated(owner.clone()), &flower_order())
        .await?
        .data
        .order;
    let request = CreatePaymentIntentRequest {
        order_id: order.order_id,
    };

    let intent = orchestrator.create_payment_intent(&owner, &request).await?;
    assert_eq!(intent.data.amount, 9300);
    assert_eq!(intent.data.client_secret, "pi_123_secret");

    let stranger = orchestrator
        .create_payment_intent(&customer("user-10"), &request)
        .await;
    assert!(matches!(stranger, Err(ServiceError::Forbidden(_))));

    Ok(())
}

#[tokio::test]
async fn paid_orders_get_no_new_payment_intent() -> TestResult {
    let store = MemoryStore::new();
    let mut parts = Parts::new(&store);
    let mut gateway = MockPaymentGatewayTrait::new();
    gateway.expect_create_payment_intent().never();
    parts.gateway = Arc::new(gateway);
    let orchestrator = parts.build();

    let order = orchestrator
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;
    orchestrator
        .update_order(
            &admin(),
            order.order_id,
            &UpdateOrderRequest {
                payment_status: Some(PaymentStatus::Paid),
                ..Default::default()
            },
        )
        .await?;

    let result = orchestrator
        .create_payment_intent(
            &admin(),
            &CreatePaymentIntentRequest {
                order_id: order.order_id,
            },
        )
        .await;

    assert!(matches!(result, Err(ServiceError::Validation(_))));

    Ok(())
}

#[tokio::test]
async fn generating_an_invoice_reports_a_failed_order_link() -> TestResult {
    let store = MemoryStore::new();
    let parts = Parts::new(&store);
    let order_command = parts.order_command.clone();
    let order = parts
        .build()
        .create_order(&Caller::Guest, &flower_order())
        .await?
        .data
        .order;
    let invoice_id = order.invoice_id.ok_or("order should be linked to its invoice")?;
    order_command.unlink_invoice(order.order_id, invoice_id).await?;

    let mut parts = Parts::new(&store);
    let mut broken = MockOrderCommandServiceTrait::new();
    broken.expect_update_order().returning(|_, _| {
        Err(ServiceError::Repo(RepositoryError::Custom(
            "connection reset".into(),
        )))
    });
    parts.order_command = Arc::new(broken);

    let generated = parts
        .build()
        .generate_invoice(&admin(), order.order_id)
        .await?
        .data;

    assert_eq!(generated.invoice.invoice_id, invoice_id);
    match generated.order_link {
        StepOutcome::Failed { reason } => assert!(reason.contains("connection reset"), "{reason}"),
        other => panic!("expected a failed order link, got {other:?}"),
    }

    Ok(())
}
