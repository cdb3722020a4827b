use std::time::Duration;

use anyhow::Context;

use reqwest::Client;

use serde::Serialize;

use secrecy::Secret;

use url::Url;

use crate::domain::EmailAddress;

/// Client for the transactional-email REST API
#[derive(Debug)]
pub struct EmailClient {
    client: Client,
    sender: String,

    api_send_email_url: Url,
    api_auth_token: Secret<String>,
}

impl EmailClient {
    pub fn new(
        sender: EmailAddress,
        sender_name: &str,
        api_timeout: Duration,
        api_base_url: Url,
        api_auth_token: Secret<String>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let api_send_email_url = api_base_url
            .join("emails")
            .context("Failed to create send email endpoint URL")?;

        let sender = if sender_name.trim().is_empty() {
            sender.to_string()
        } else {
            format!("{} <{}>", sender_name.trim(), sender)
        };

        Ok(Self {
            client,
            sender,
            api_send_email_url,
            api_auth_token,
        })
    }

    /// Send a single email to a single recipient
    #[tracing::instrument(name = "Send an email via API", skip(self, email), fields(recipient = %email.recipient))]
    pub async fn send(&self, email: &Email) -> reqwest::Result<()> {
        use secrecy::ExposeSecret;

        let body = email.as_request(&self.sender);

        self.client
            .post(self.api_send_email_url.clone())
            .bearer_auth(self.api_auth_token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Email {
    pub recipient: EmailAddress,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl Email {
    fn as_request<'e>(&'e self, sender: &'e str) -> SendEmailRequest<'e> {
        SendEmailRequest {
            from: sender,
            to: [self.recipient.as_ref()],
            subject: &self.subject,
            html: &self.html_body,
            text: &self.text_body,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}
