use actix_web::{post, web, HttpResponse, Responder};

use serde::Deserialize;

use sqlx::PgPool;

use crate::client::EmailClient;
use crate::controller::Acknowledgement;
use crate::domain::{Audience, EmailAddress, ServiceName};
use crate::error::{RestError, RestResult};
use crate::service::{self, SubscribeOutcome, UnsubscribeOutcome};
use crate::templates::EmailTemplates;

#[derive(Debug, Deserialize)]
pub struct NewsletterSubscribeBody {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSubscribeBody {
    email: Option<String>,
    service_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeBody {
    email: Option<String>,
    service_name: Option<String>,
}

fn parse_email(email: Option<&str>) -> RestResult<EmailAddress> {
    email
        .unwrap_or_default()
        .parse()
        .map_err(RestError::ParseError)
}

fn parse_service(service_name: Option<&str>) -> RestResult<ServiceName> {
    service_name
        .unwrap_or_default()
        .parse()
        .map_err(RestError::ParseError)
}

/// Subscribe to the general newsletter
#[tracing::instrument(
    name = "Subscribe to the newsletter",
    skip(pool, email_client, templates)
)]
#[post("/newsletter-subscribe")]
async fn newsletter_subscribe(
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    templates: web::Data<EmailTemplates>,
    body: web::Json<NewsletterSubscribeBody>,
) -> RestResult<impl Responder> {
    let email = parse_email(body.email.as_deref())?;

    let outcome = service::subscribe(
        pool.get_ref(),
        email_client.get_ref(),
        templates.get_ref(),
        email,
        Audience::Newsletter,
    )
    .await?;

    let message = match outcome {
        SubscribeOutcome::AlreadySubscribed => "You are already subscribed!",
        SubscribeOutcome::Reactivated | SubscribeOutcome::Created => {
            "Successfully subscribed to the newsletter!"
        }
    };
    Ok(HttpResponse::Ok().json(Acknowledgement::new(message)))
}

/// Subscribe to the update list of one service
#[tracing::instrument(
    name = "Subscribe to service updates",
    skip(pool, email_client, templates)
)]
#[post("/service-subscribe")]
async fn service_subscribe(
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    templates: web::Data<EmailTemplates>,
    body: web::Json<ServiceSubscribeBody>,
) -> RestResult<impl Responder> {
    let email = parse_email(body.email.as_deref())?;
    let service_name = parse_service(body.service_name.as_deref())?;

    let outcome = service::subscribe(
        pool.get_ref(),
        email_client.get_ref(),
        templates.get_ref(),
        email,
        Audience::Service(service_name),
    )
    .await?;

    let message = match outcome {
        SubscribeOutcome::AlreadySubscribed => {
            "You are already subscribed to this service!".to_string()
        }
        SubscribeOutcome::Reactivated | SubscribeOutcome::Created => {
            format!("Successfully subscribed to {} updates!", service_name)
        }
    };
    Ok(HttpResponse::Ok().json(Acknowledgement::new(message)))
}

/// Leave the general newsletter, or a service list when `serviceName` is given
#[tracing::instrument(name = "Unsubscribe", skip(pool))]
#[post("/newsletter-unsubscribe")]
async fn unsubscribe(
    pool: web::Data<PgPool>,
    body: web::Json<UnsubscribeBody>,
) -> RestResult<impl Responder> {
    let email = parse_email(body.email.as_deref())?;
    let audience = Audience::from_service_filter(body.service_name.as_deref())
        .map_err(RestError::ParseError)?;

    let message = match service::unsubscribe(pool.get_ref(), email, audience).await? {
        UnsubscribeOutcome::Unsubscribed => "Successfully unsubscribed",
        UnsubscribeOutcome::NotSubscribed => "You are not subscribed",
    };
    Ok(HttpResponse::Ok().json(Acknowledgement::new(message)))
}

/// Subscription API endpoints
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(newsletter_subscribe)
        .service(service_subscribe)
        .service(unsubscribe);
}
