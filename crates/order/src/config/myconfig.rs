use crate::service::{
    notification::{MessageTemplates, SmsSettings, SmtpSettings},
    payment::StripeSettings,
};
use anyhow::{Context, Result, anyhow};
use std::{str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    /// Falls back to the in-memory store when unset.
    pub database_url: Option<String>,
    pub db_min_conn: u32,
    pub db_max_conn: u32,
    pub run_migrations: bool,
    pub port: u16,
    pub jwt_secret: String,
    pub otel_endpoint: String,
    pub is_dev: bool,
    pub enable_file_log: bool,
    pub currency: String,
    pub external_timeout: Duration,
    pub stripe: StripeSettings,
    pub sms: SmsSettings,
    pub smtp: SmtpSettings,
    pub templates: MessageTemplates,
    pub tracking_url_base: String,
    pub delivery_lead_days: i64,
    pub invoice_due_days: i64,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var_or(name, default)
        .parse::<T>()
        .with_context(|| format!("Unable to parse {name}"))
}

fn parse_flag(name: &str, default: bool) -> Result<bool> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => match value.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(anyhow!("{name} must be 'true' or 'false', got '{other}'")),
        },
    }
}

impl Config {
    pub fn init() -> Result<Self> {
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;

        let port = std::env::var("PORT")
            .context("Missing environment variable: PORT")?
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let database_url = std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let external_timeout = Duration::from_secs(parse_var("EXTERNAL_TIMEOUT_SECS", "10")?);

        let defaults = MessageTemplates::default();
        let templates = MessageTemplates {
            order_confirmation: var_or("ORDER_CONFIRMATION_TEMPLATE", &defaults.order_confirmation),
            order_shipped: var_or("ORDER_SHIPPED_TEMPLATE", &defaults.order_shipped),
            order_delivered: var_or("ORDER_DELIVERED_TEMPLATE", &defaults.order_delivered),
            order_cancelled: var_or("ORDER_CANCELLED_TEMPLATE", &defaults.order_cancelled),
        };

        Ok(Self {
            database_url,
            db_min_conn: parse_var("DB_MIN_CONNECTION", "1")?,
            db_max_conn: parse_var("DB_MAX_CONNECTION", "5")?,
            run_migrations: parse_flag("RUN_MIGRATIONS", false)?,
            port,
            jwt_secret,
            otel_endpoint: var_or("OTEL_ENDPOINT", "http://otel-collector:4317"),
            is_dev: parse_flag("DEV_MODE", false)?,
            enable_file_log: parse_flag("ENABLE_FILE_LOG", false)?,
            currency: var_or("PAYMENT_CURRENCY", "usd"),
            external_timeout,
            stripe: StripeSettings {
                api_base: var_or("STRIPE_API_BASE", "https://api.stripe.com"),
                secret_key: var_or("STRIPE_SECRET_KEY", ""),
                webhook_secret: var_or("STRIPE_WEBHOOK_SECRET", ""),
                tolerance_secs: parse_var("WEBHOOK_TOLERANCE_SECS", "300")?,
                timeout: external_timeout,
            },
            sms: SmsSettings {
                enabled: parse_flag("SMS_ENABLED", false)?,
                api_base: var_or("TWILIO_API_BASE", "https://api.twilio.com"),
                account_sid: var_or("TWILIO_ACCOUNT_SID", ""),
                auth_token: var_or("TWILIO_AUTH_TOKEN", ""),
                from_number: var_or("TWILIO_FROM_NUMBER", ""),
                timeout: external_timeout,
            },
            smtp: SmtpSettings {
                enabled: parse_flag("EMAIL_ENABLED", false)?,
                host: var_or("SMTP_HOST", "localhost"),
                port: parse_var("SMTP_PORT", "587")?,
                username: var_or("SMTP_USERNAME", ""),
                password: var_or("SMTP_PASSWORD", ""),
                from: var_or("SMTP_FROM", "orders@example.com"),
                timeout: external_timeout,
            },
            templates,
            tracking_url_base: var_or("TRACKING_URL_BASE", "https://example.com/track/"),
            delivery_lead_days: parse_var("DELIVERY_LEAD_DAYS", "5")?,
            invoice_due_days: parse_var("INVOICE_DUE_DAYS", "30")?,
        })
    }
}
