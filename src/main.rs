use std::net::TcpListener;

use anyhow::Context;

use sqlx::postgres::PgPoolOptions;

use telliarch::app;
use telliarch::client::{ChatClient, EmailClient};
use telliarch::crypto::SigningKey;
use telliarch::settings::Settings;
use telliarch::telemetry;
use telliarch::templates::EmailTemplates;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber(telemetry::DEFAULT_ENV_FILTER, std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;

    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(settings.database.with_db());

    let signing_key = SigningKey::new(settings.app.secret_key())?;

    let email_client = EmailClient::new(
        settings.email.sender()?,
        settings.email.sender_name(),
        settings.email.api_timeout(),
        settings.email.api_base_url()?,
        settings.email.api_auth_token(),
    )?;

    let chat_client = ChatClient::new(
        settings.chat.model(),
        settings.chat.api_timeout(),
        settings.chat.api_base_url()?,
        settings.chat.api_key(),
    )?;

    let templates = EmailTemplates::new(settings.email.website_url()?);

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    app::run(
        listener,
        pool,
        signing_key,
        email_client,
        chat_client,
        templates,
    )?
    .await
    .context("Failed to run app")
}
