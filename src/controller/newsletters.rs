use actix_web::{get, post, web, HttpResponse, Responder};

use serde::{Deserialize, Serialize};

use sqlx::PgPool;

use crate::auth::Administrator;
use crate::client::EmailClient;
use crate::domain::Audience;
use crate::error::{RestError, RestResult};
use crate::repo::SentNewsletterRepo;
use crate::service::{self, Broadcast};
use crate::templates::EmailTemplates;

/// Number of history entries returned by the history endpoint
const HISTORY_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNewsletterBody {
    subject: Option<String>,
    content: Option<String>,
    service_filter: Option<String>,
}

impl SendNewsletterBody {
    fn into_broadcast(self, admin: &Administrator) -> RestResult<Broadcast> {
        let subject = non_blank(self.subject);
        let content = non_blank(self.content);
        let (subject, content) = subject
            .zip(content)
            .ok_or_else(|| RestError::ParseError("Subject and content are required".into()))?;

        let audience = Audience::from_service_filter(self.service_filter.as_deref())
            .map_err(RestError::ParseError)?;

        Ok(Broadcast {
            subject,
            content,
            audience,
            sent_by: *admin.as_ref(),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize)]
pub struct SendNewsletterResponse {
    success: bool,
    message: String,
    sent: usize,
    failed: usize,
}

/// Send a newsletter to every active subscriber of the chosen audience
#[tracing::instrument(
    name = "Send a newsletter",
    skip(pool, email_client, templates, body),
    fields(admin = %admin.as_ref())
)]
#[post("/send-newsletter")]
async fn send(
    admin: Administrator, // Administrator guard
    body: web::Json<SendNewsletterBody>,
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    templates: web::Data<EmailTemplates>,
) -> RestResult<impl Responder> {
    let broadcast = body.into_inner().into_broadcast(&admin)?;

    let report = service::broadcast(
        pool.get_ref(),
        email_client.get_ref(),
        templates.get_ref(),
        &broadcast,
    )
    .await?;

    Ok(HttpResponse::Ok().json(SendNewsletterResponse {
        success: true,
        message: report.message(),
        sent: report.sent,
        failed: report.failed,
    }))
}

/// Most recent broadcasts, newest first
#[tracing::instrument(name = "List sent newsletters", skip(pool))]
#[get("/sent-newsletters")]
async fn history(_admin: Administrator, pool: web::Data<PgPool>) -> RestResult<impl Responder> {
    let sent = SentNewsletterRepo::fetch_recent(pool.get_ref(), HISTORY_LIMIT).await?;

    Ok(HttpResponse::Ok().json(sent))
}

/// Newsletter API endpoints
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(send).service(history);
}
