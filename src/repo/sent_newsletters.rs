use uuid::Uuid;

use chrono::{DateTime, Utc};

use serde::Serialize;

use sqlx::PgExecutor;

/// Audit record of a broadcast about to be stored
#[derive(Debug)]
pub struct NewSentNewsletter<'a> {
    pub subject: &'a str,
    pub content: &'a str,
    pub service_filter: Option<&'a str>,
    pub sent_by: Uuid,
    /// Successful sends only
    pub recipient_count: i32,
}

/// Stored audit record of a broadcast
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SentNewsletter {
    pub id: Uuid,
    pub subject: String,
    pub content: String,
    pub service_filter: Option<String>,
    pub sent_by: Uuid,
    pub sent_at: DateTime<Utc>,
    pub recipient_count: i32,
}

/// Append-only history of sent newsletters
pub struct SentNewsletterRepo;

impl SentNewsletterRepo {
    #[tracing::instrument(name = "Record sent newsletter", skip(executor, newsletter), fields(subject = %newsletter.subject))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        newsletter: &NewSentNewsletter<'_>,
    ) -> sqlx::Result<Uuid> {
        sqlx::query_scalar(
            r#"
            insert into sent_newsletters (subject, content, service_filter, sent_by, recipient_count)
            values ($1, $2, $3, $4, $5)
            returning id
            "#,
        )
        .bind(newsletter.subject)
        .bind(newsletter.content)
        .bind(newsletter.service_filter)
        .bind(newsletter.sent_by)
        .bind(newsletter.recipient_count)
        .fetch_one(executor)
        .await
    }

    /// Most recent entries first
    #[tracing::instrument(name = "Fetch recent sent newsletters", skip(executor))]
    pub async fn fetch_recent<'con>(
        executor: impl PgExecutor<'con>,
        limit: i64,
    ) -> sqlx::Result<Vec<SentNewsletter>> {
        sqlx::query_as(
            r#"
            select id, subject, content, service_filter, sent_by, sent_at, recipient_count
            from sent_newsletters
            order by sent_at desc
            limit $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await
    }
}
