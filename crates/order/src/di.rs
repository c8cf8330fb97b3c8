use crate::{
    abstract_trait::{
        invoice::repository::{DynInvoiceCommandRepository, DynInvoiceQueryRepository},
        lifecycle::{DynInvoiceLifecycle, DynOrderLifecycle, DynPaymentLifecycle},
        notification::{DynNotificationChannel, DynNotificationRepository},
        order::repository::{DynOrderCommandRepository, DynOrderQueryRepository},
        payment::{DynPaymentEventRepository, DynPaymentGateway},
    },
    repository::{
        InvoiceCommandRepository, InvoiceQueryRepository, MemoryStore, NotificationRepository,
        OrderCommandRepository, OrderQueryRepository, PaymentEventRepository,
    },
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
    },
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc, time::Duration};

#[derive(Clone)]
pub struct Repositories {
    pub order_command: DynOrderCommandRepository,
    pub order_query: DynOrderQueryRepository,
    pub invoice_command: DynInvoiceCommandRepository,
    pub invoice_query: DynInvoiceQueryRepository,
    pub payment_events: DynPaymentEventRepository,
    pub notifications: DynNotificationRepository,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            order_command: Arc::new(OrderCommandRepository::new(pool.clone())),
            order_query: Arc::new(OrderQueryRepository::new(pool.clone())),
            invoice_command: Arc::new(InvoiceCommandRepository::new(pool.clone())),
            invoice_query: Arc::new(InvoiceQueryRepository::new(pool.clone())),
            payment_events: Arc::new(PaymentEventRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool)),
        }
    }

    pub fn memory(store: &MemoryStore) -> Self {
        Self {
            order_command: Arc::new(store.clone()),
            order_query: Arc::new(store.clone()),
            invoice_command: Arc::new(store.clone()),
            invoice_query: Arc::new(store.clone()),
            payment_events: Arc::new(store.clone()),
            notifications: Arc::new(store.clone()),
        }
    }
}

/// Business knobs shared by the services, independent of any provider.
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub templates: MessageTemplates,
    pub tracking_url_base: String,
    pub currency: String,
    pub delivery_lead_days: i64,
    pub invoice_due_days: i64,
    pub notification_timeout: Duration,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            templates: MessageTemplates::default(),
            tracking_url_base: "https://example.com/track/".to_string(),
            currency: "usd".to_string(),
            delivery_lead_days: 5,
            invoice_due_days: 30,
            notification_timeout: Duration::from_secs(10),
        }
    }
}

pub struct DependenciesInjectDeps {
    pub repositories: Repositories,
    pub gateway: DynPaymentGateway,
    pub channels: Vec<DynNotificationChannel>,
    pub settings: LifecycleSettings,
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_lifecycle: DynOrderLifecycle,
    pub invoice_lifecycle: DynInvoiceLifecycle,
    pub payment_lifecycle: DynPaymentLifecycle,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_lifecycle", &"OrderLifecycleOrchestrator")
            .field("invoice_lifecycle", &"OrderLifecycleOrchestrator")
            .field("payment_lifecycle", &"OrderLifecycleOrchestrator")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            repositories,
            gateway,
            channels,
            settings,
        } = deps;

        let notifications = Arc::new(NotificationDispatcher::new(
            NotificationDispatcherDeps {
                channels,
                repository: repositories.notifications.clone(),
                timeout: settings.notification_timeout,
            },
            registry,
        ));

        let order_command = Arc::new(OrderCommandService::new(
            OrderCommandServiceDeps {
                command: repositories.order_command.clone(),
                query: repositories.order_query.clone(),
                delivery_lead_days: settings.delivery_lead_days,
            },
            registry,
        ));

        let order_query = Arc::new(OrderQueryService::new(
            OrderQueryServiceDeps {
                query: repositories.order_query.clone(),
            },
            registry,
        ));

        let invoice_command = Arc::new(InvoiceCommandService::new(
            InvoiceCommandServiceDeps {
                command: repositories.invoice_command.clone(),
                query: repositories.invoice_query.clone(),
                notifications: notifications.clone(),
                due_days: settings.invoice_due_days,
            },
            registry,
        ));

        let invoice_query = Arc::new(InvoiceQueryService::new(
            InvoiceQueryServiceDeps {
                query: repositories.invoice_query.clone(),
            },
            registry,
        ));

        let orchestrator = Arc::new(OrderLifecycleOrchestrator::new(OrderLifecycleDeps {
            order_command,
            order_query,
            invoice_command,
            invoice_query,
            notifications,
            gateway,
            payment_events: repositories.payment_events,
            templates: settings.templates,
            tracking_url_base: settings.tracking_url_base,
            currency: settings.currency,
        }));

        Self {
            order_lifecycle: orchestrator.clone(),
            invoice_lifecycle: orchestrator.clone(),
            payment_lifecycle: orchestrator,
        }
    }
}
