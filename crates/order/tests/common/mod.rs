#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use hmac::{Hmac, Mac};
use order::{
    abstract_trait::{
        invoice::service::{DynInvoiceCommandService, DynInvoiceQueryService},
        notification::{
            DynNotificationChannel, DynNotificationService, MockNotificationChannelTrait,
            NotificationChannelTrait,
        },
        order::service::{DynOrderCommandService, DynOrderQueryService},
        payment::{DynPaymentEventRepository, DynPaymentGateway},
    },
    di::{DependenciesInjectDeps, LifecycleSettings, Repositories},
    domain::requests::order::{CreateOrderItemRequest, CreateOrderRequest, CustomerRequest},
    handler::AppRouter,
    model::{notification::Channel, order::Address},
    repository::MemoryStore,
    service::{
        invoice::{
            InvoiceCommandService, InvoiceCommandServiceDeps, InvoiceQueryService,
            InvoiceQueryServiceDeps,
        },
        lifecycle::{OrderLifecycleDeps, OrderLifecycleOrchestrator},
        notification::{MessageTemplates, NotificationDispatcher, NotificationDispatcherDeps},
        order::{
            OrderCommandService, OrderCommandServiceDeps, OrderQueryService,
            OrderQueryServiceDeps,
        },
        payment::{StripeGateway, StripeSettings},
    },
    state::AppState,
};
use prometheus_client::registry::Registry;
use serde_json::json;
use sha2::Sha256;
use shared::{
    abstract_trait::{DynJwtService, JwtServiceTrait},
    config::JwtConfig,
    domain::{Identity, Role},
    errors::ServiceError,
};
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

pub const WEBHOOK_SECRET: &str = "whsec_test";
pub const JWT_SECRET: &str = "test-jwt-secret";

pub fn admin() -> Identity {
    Identity::new("admin-1", Role::Admin)
}

pub fn customer(subject_id: &str) -> Identity {
    Identity::new(subject_id, Role::Customer)
}

pub fn flower_order() -> CreateOrderRequest {
    CreateOrderRequest {
        customer: CustomerRequest {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: Some("+15550001111".into()),
        },
        items: vec![CreateOrderItemRequest {
            product_id: "flower-35".into(),
            name: "Flower 3.5g".into(),
            unit_price: 4000,
            quantity: 2,
        }],
        shipping_address: Address {
            line1: "1 Main St".into(),
            line2: None,
            city: "Springfield".into(),
            state: Some("IL".into()),
            postal_code: "62701".into(),
            country: "US".into(),
        },
        billing_address: None,
        tax: 800,
        shipping: 500,
        discount: 0,
        total: None,
        notes: None,
    }
}

pub fn sent_channel(channel: Channel) -> DynNotificationChannel {
    let mut mock = MockNotificationChannelTrait::new();
    mock.expect_channel().return_const(channel);
    mock.expect_is_enabled().return_const(true);
    mock.expect_deliver().returning(|_, _, _| Ok(None));
    Arc::new(mock)
}

pub fn failing_channel(channel: Channel) -> DynNotificationChannel {
    let mut mock = MockNotificationChannelTrait::new();
    mock.expect_channel().return_const(channel);
    mock.expect_is_enabled().return_const(true);
    mock.expect_deliver()
        .returning(|_, _, _| Err(ServiceError::Dependency("provider is down".into())));
    Arc::new(mock)
}

/// Channel that answers only after `delay`.
pub struct SlowChannel {
    pub channel: Channel,
    pub delay: Duration,
}

#[async_trait]
impl NotificationChannelTrait for SlowChannel {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn deliver(
        &self,
        _destination: &str,
        _subject: &str,
        _body: &str,
    ) -> Result<Option<String>, ServiceError> {
        tokio::time::sleep(self.delay).await;
        Ok(Some("late-message".into()))
    }
}

pub fn gateway() -> DynPaymentGateway {
    let gateway = StripeGateway::new(StripeSettings {
        api_base: "http://127.0.0.1:9".into(),
        secret_key: String::new(),
        webhook_secret: WEBHOOK_SECRET.into(),
        tolerance_secs: 300,
        timeout: Duration::from_secs(1),
    })
    .expect("gateway client should build");

    Arc::new(gateway)
}

pub fn default_channels() -> Vec<DynNotificationChannel> {
    vec![sent_channel(Channel::Sms), sent_channel(Channel::Email)]
}

/// Fully wired application over a fresh in-memory store.
pub struct TestApp {
    pub store: MemoryStore,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_channels(default_channels())
    }

    pub fn with_channels(channels: Vec<DynNotificationChannel>) -> Self {
        let store = MemoryStore::new();

        let deps = DependenciesInjectDeps {
            repositories: Repositories::memory(&store),
            gateway: gateway(),
            channels,
            settings: LifecycleSettings::default(),
        };

        let jwt: DynJwtService = Arc::new(JwtConfig::new(JWT_SECRET));
        let state = AppState::from_deps(deps, jwt);

        Self {
            store,
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        AppRouter::build(self.state.clone())
    }

    pub fn token(&self, identity: &Identity) -> String {
        self.state
            .jwt_config
            .generate_token(&identity.subject_id, identity.role, "access")
            .expect("token should be issued")
    }
}

/// Real services over `store`; individual collaborators can be swapped for
/// mocks before calling [`Parts::build`].
pub struct Parts {
    pub order_command: DynOrderCommandService,
    pub order_query: DynOrderQueryService,
    pub invoice_command: DynInvoiceCommandService,
    pub invoice_query: DynInvoiceQueryService,
    pub notifications: DynNotificationService,
    pub gateway: DynPaymentGateway,
    pub payment_events: DynPaymentEventRepository,
}

impl Parts {
    pub fn new(store: &MemoryStore) -> Self {
        Self::with_channels(store, default_channels(), Duration::from_secs(5))
    }

    pub fn with_channels(
        store: &MemoryStore,
        channels: Vec<DynNotificationChannel>,
        timeout: Duration,
    ) -> Self {
        let mut registry = Registry::default();
        let repos = Repositories::memory(store);

        let notifications = Arc::new(NotificationDispatcher::new(
            NotificationDispatcherDeps {
                channels,
                repository: repos.notifications.clone(),
                timeout,
            },
            &mut registry,
        ));

        Self {
            order_command: Arc::new(OrderCommandService::new(
                OrderCommandServiceDeps {
                    command: repos.order_command.clone(),
                    query: repos.order_query.clone(),
                    delivery_lead_days: 5,
                },
                &mut registry,
            )),
            order_query: Arc::new(OrderQueryService::new(
                OrderQueryServiceDeps {
                    query: repos.order_query.clone(),
                },
                &mut registry,
            )),
            invoice_command: Arc::new(InvoiceCommandService::new(
                InvoiceCommandServiceDeps {
                    command: repos.invoice_command.clone(),
                    query: repos.invoice_query.clone(),
                    notifications: notifications.clone(),
                    due_days: 30,
                },
                &mut registry,
            )),
            invoice_query: Arc::new(InvoiceQueryService::new(
                InvoiceQueryServiceDeps {
                    query: repos.invoice_query.clone(),
                },
                &mut registry,
            )),
            notifications,
            gateway: gateway(),
            payment_events: repos.payment_events,
        }
    }

    pub fn build(self) -> OrderLifecycleOrchestrator {
        OrderLifecycleOrchestrator::new(OrderLifecycleDeps {
            order_command: self.order_command,
            order_query: self.order_query,
            invoice_command: self.invoice_command,
            invoice_query: self.invoice_query,
            notifications: self.notifications,
            gateway: self.gateway,
            payment_events: self.payment_events,
            templates: MessageTemplates::default(),
            tracking_url_base: "https://example.com/track/".into(),
            currency: "usd".into(),
        })
    }
}

pub fn sign(payload: &[u8]) -> String {
    let timestamp = Utc::now().timestamp();
    let mut mac =
        Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).expect("hmac accepts any key");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    format!(
        "t={timestamp},v1={}",
        hex::encode(mac.finalize().into_bytes())
    )
}

pub fn payment_event(event_id: &str, event_type: &str, order_id: Uuid, created: i64) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": event_id,
        "type": event_type,
        "created": created,
        "data": {
            "object": {
                "id": "pi_test",
                "amount": 9300,
                "metadata": { "order_id": order_id.to_string() }
            }
        }
    }))
    .expect("event should serialize")
}
