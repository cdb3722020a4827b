use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{error, get, guard, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use sqlx::PgPool;

use tracing_actix_web::TracingLogger;

use crate::client::{ChatClient, EmailClient};
use crate::controller::{chat, newsletters, subscriptions};
use crate::cors;
use crate::crypto::SigningKey;
use crate::error::RestError;
use crate::templates::EmailTemplates;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("I am alive")
}

/// Malformed JSON bodies get the same `{error}` shape as every other failure
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
            err => format!("Invalid request body: {}", err),
        };
        RestError::ParseError(message).into()
    })
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    pool: PgPool,
    signing_key: SigningKey,
    email_client: EmailClient,
    chat_client: ChatClient,
    templates: EmailTemplates,
) -> anyhow::Result<Server> {
    // Wrap application data
    let pool = web::Data::new(pool);
    let signing_key = web::Data::new(signing_key);
    let email_client = web::Data::new(email_client);
    let chat_client = web::Data::new(chat_client);
    let templates = web::Data::new(templates);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors::headers())
            .wrap(TracingLogger::default())
            .app_data(json_config())
            .app_data(pool.clone())
            .app_data(signing_key.clone())
            .app_data(email_client.clone())
            .app_data(chat_client.clone())
            .app_data(templates.clone())
            // Preflight must win over the method-specific routes below
            .service(
                web::resource("/{tail:.*}")
                    .guard(guard::Options())
                    .to(cors::preflight),
            )
            .service(health_check)
            .configure(subscriptions::configure)
            .configure(newsletters::configure)
            .configure(chat::configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
