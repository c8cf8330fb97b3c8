use crate::{
    abstract_trait::notification::DynNotificationChannel,
    config::myconfig::Config,
    di::{DependenciesInject, DependenciesInjectDeps, LifecycleSettings, Repositories},
    repository::MemoryStore,
    service::{
        notification::{SmsChannel, SmtpChannel},
        payment::StripeGateway,
    },
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::DynJwtService,
    config::{ConnectionPool, JwtConfig},
};
use std::{fmt, sync::Arc};
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Registry>,
    pub jwt_config: DynJwtService,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("deps", &self.di_container)
            .field("registry", &self.registry)
            .finish()
    }
}

impl AppState {
    /// Wires Postgres repositories when a pool is given, the in-memory
    /// store otherwise.
    pub fn new(pool: Option<ConnectionPool>, config: &Config) -> Result<Self> {
        let repositories = match pool {
            Some(pool) => Repositories::postgres(pool),
            None => {
                warn!("⚠️ No DATABASE_URL configured, orders are kept in memory only");
                Repositories::memory(&MemoryStore::new())
            }
        };

        let gateway = Arc::new(
            StripeGateway::new(config.stripe.clone())
                .context("Failed to build payment gateway client")?,
        );

        let sms: DynNotificationChannel = Arc::new(
            SmsChannel::new(config.sms.clone()).context("Failed to build SMS channel")?,
        );
        let email: DynNotificationChannel = Arc::new(SmtpChannel::new(&config.smtp));

        let settings = LifecycleSettings {
            templates: config.templates.clone(),
            tracking_url_base: config.tracking_url_base.clone(),
            currency: config.currency.clone(),
            delivery_lead_days: config.delivery_lead_days,
            invoice_due_days: config.invoice_due_days,
            notification_timeout: config.external_timeout,
        };

        let deps = DependenciesInjectDeps {
            repositories,
            gateway,
            channels: vec![sms, email],
            settings,
        };

        let jwt_config = Arc::new(JwtConfig::new(&config.jwt_secret)) as DynJwtService;

        Ok(Self::from_deps(deps, jwt_config))
    }

    pub fn from_deps(deps: DependenciesInjectDeps, jwt_config: DynJwtService) -> Self {
        let mut registry = Registry::default();

        let di_container = DependenciesInject::new(deps, &mut registry);

        Self {
            di_container,
            registry: Arc::new(registry),
            jwt_config,
        }
    }
}
