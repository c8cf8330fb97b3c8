use crate::{abstract_trait::notification::NotificationChannelTrait, model::notification::Channel};
use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use shared::errors::ServiceError;
use std::time::Duration;
use tracing::{error, info};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub timeout: Duration,
}

#[derive(Template)]
#[template(path = "notification_email.html")]
struct NotificationEmail<'a> {
    subject: &'a str,
    paragraphs: Vec<&'a str>,
}

pub(crate) fn render_email(subject: &str, body: &str) -> Result<String, askama::Error> {
    NotificationEmail {
        subject,
        paragraphs: body
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect(),
    }
    .render()
}

#[derive(Clone)]
pub struct SmtpChannel {
    mailer: Option<SmtpTransport>,
    from: Option<Mailbox>,
}

impl SmtpChannel {
    /// A channel with an unusable relay or sender address stays disabled.
    pub fn new(settings: &SmtpSettings) -> Self {
        if !settings.enabled {
            return Self {
                mailer: None,
                from: None,
            };
        }

        let mailer = match SmtpTransport::starttls_relay(&settings.host) {
            Ok(builder) => Some(
                builder
                    .credentials(Credentials::new(
                        settings.username.clone(),
                        settings.password.clone(),
                    ))
                    .port(settings.port)
                    .timeout(Some(settings.timeout))
                    .build(),
            ),
            Err(e) => {
                error!("❌ Failed to create SMTP relay for {}: {}", settings.host, e);
                None
            }
        };

        let from = match settings.from.parse::<Mailbox>() {
            Ok(from) => Some(from),
            Err(e) => {
                error!("❌ Invalid sender email {}: {}", settings.from, e);
                None
            }
        };

        Self { mailer, from }
    }
}

#[async_trait]
impl NotificationChannelTrait for SmtpChannel {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    fn is_enabled(&self) -> bool {
        self.mailer.is_some() && self.from.is_some()
    }

    async fn deliver(
        &self,
        destination: &str,
        subject: &str,
        body: &str,
    ) -> Result<Option<String>, ServiceError> {
        let (Some(mailer), Some(from)) = (&self.mailer, &self.from) else {
            return Err(ServiceError::Dependency("SMTP is not configured".into()));
        };

        let html = render_email(subject, body).map_err(|e| {
            error!("❌ Failed to render email template: {}", e);
            ServiceError::Internal(format!("Failed to render email template: {e}"))
        })?;

        let to: Mailbox = destination.parse().map_err(|e| {
            error!("❌ Invalid recipient email: {}", e);
            ServiceError::Dependency(format!("Invalid recipient email: {e}"))
        })?;

        let email = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| {
                error!("❌ Failed to build email: {}", e);
                ServiceError::Internal(format!("Failed to build email: {e}"))
            })?;

        match mailer.send(email).await {
            Ok(response) => {
                info!("✅ Email sent to {destination}");
                Ok(response.message().next().map(str::to_string))
            }
            Err(e) => {
                error!("❌ Failed to send email to {destination}: {e}");
                Err(ServiceError::Dependency(format!("Failed to send email: {e}")))
            }
        }
    }
}
