use serde::Serialize;
use std::time::Duration;

use crate::api::error;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: String) -> Result<(), error::SystemError>;
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub sender_email: String,
    pub sender_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    html_content: String,
}

/// Brevo transactional e-mail API.
pub struct BrevoMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender: (String, String),
}

impl BrevoMailer {
    pub fn new(config: MailConfig, api_key: String) -> Result<Self, error::SystemError> {
        Self::with_endpoint(config, api_key, BREVO_SEND_URL, SEND_TIMEOUT)
    }

    fn with_endpoint(
        config: MailConfig,
        api_key: String,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, error::SystemError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key,
            sender: (config.sender_email, config.sender_name),
        })
    }
}

#[async_trait::async_trait]
impl Mailer for BrevoMailer {
    async fn send(&self, to: &str, subject: &str, html: String) -> Result<(), error::SystemError> {
        let body = SendEmailBody {
            sender: EmailAddress { email: self.sender.0.clone(), name: Some(self.sender.1.clone()) },
            to: vec![EmailAddress { email: to.to_string(), name: None }],
            subject: subject.to_string(),
            html_content: html,
        };

        self.client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!("Mail '{}' sent to {}", subject, to);
        Ok(())
    }
}

/// Used when no mail API key is configured.
pub struct NoopMailer;

#[async_trait::async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _html: String) -> Result<(), error::SystemError> {
        tracing::info!("Mail disabled, dropping '{}' for {}", subject, to);
        Ok(())
    }
}

pub fn build_mailer(
    mut config: MailConfig,
) -> Result<std::sync::Arc<dyn Mailer>, error::SystemError> {
    match config.api_key.take() {
        Some(key) => Ok(std::sync::Arc::new(BrevoMailer::new(config, key)?)),
        None => {
            tracing::warn!("BREVO_API_KEY not set, outgoing mail is disabled");
            Ok(std::sync::Arc::new(NoopMailer))
        }
    }
}
