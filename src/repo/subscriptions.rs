use uuid::Uuid;

use chrono::{DateTime, Utc};

use sqlx::{PgExecutor, Postgres};

use crate::domain::{Audience, EmailAddress};

/// Stored subscription record, from either the newsletter or a service list
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub email: String,
    /// `None` for general newsletter subscribers
    pub service_name: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    /// Set while the subscription is inactive
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Active subscriber that can receive a broadcast
#[derive(Debug, sqlx::FromRow)]
pub struct Recipient {
    pub id: Uuid,
    /// Stored email, parsed again before sending
    pub email: String,
}

/// Repository over `newsletter_subscribers` and `service_subscriptions`.
///
/// Each method picks the table from the [`Audience`]. Rows are never
/// deleted, unsubscribing only clears `is_active`.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    #[tracing::instrument(name = "Find subscription by email", skip(executor))]
    pub async fn find<'con>(
        executor: impl PgExecutor<'con>,
        audience: Audience,
        email: &EmailAddress,
    ) -> sqlx::Result<Option<Subscription>> {
        let query = match audience {
            Audience::Newsletter => sqlx::query_as::<Postgres, Subscription>(
                r#"
                select id, email, null::text as service_name, subscribed_at, unsubscribed_at, is_active
                from newsletter_subscribers
                where lower(email) = lower($1)
                "#,
            )
            .bind(email.as_ref()),
            Audience::Service(service) => sqlx::query_as::<Postgres, Subscription>(
                r#"
                select id, email, service_name, subscribed_at, unsubscribed_at, is_active
                from service_subscriptions
                where lower(email) = lower($1) and service_name = $2
                "#,
            )
            .bind(email.as_ref())
            .bind(service.as_str()),
        };

        query.fetch_optional(executor).await
    }

    /// Insert a new active subscription.
    ///
    /// Returns `None` when a concurrent request already inserted the same one.
    #[tracing::instrument(name = "Insert subscription", skip(executor))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        audience: Audience,
        email: &EmailAddress,
    ) -> sqlx::Result<Option<Uuid>> {
        let query = match audience {
            Audience::Newsletter => sqlx::query_scalar::<Postgres, Uuid>(
                r#"
                insert into newsletter_subscribers (email)
                values ($1)
                on conflict (lower(email)) do nothing
                returning id
                "#,
            )
            .bind(email.as_ref()),
            Audience::Service(service) => sqlx::query_scalar::<Postgres, Uuid>(
                r#"
                insert into service_subscriptions (email, service_name)
                values ($1, $2)
                on conflict (lower(email), service_name) do nothing
                returning id
                "#,
            )
            .bind(email.as_ref())
            .bind(service.as_str()),
        };

        query.fetch_optional(executor).await
    }

    #[tracing::instrument(name = "Reactivate subscription", skip(executor))]
    pub async fn reactivate<'con>(
        executor: impl PgExecutor<'con>,
        audience: Audience,
        id: Uuid,
    ) -> sqlx::Result<()> {
        let sql = match audience {
            Audience::Newsletter => {
                "update newsletter_subscribers set is_active = true, unsubscribed_at = null where id = $1"
            }
            Audience::Service(_) => {
                "update service_subscriptions set is_active = true, unsubscribed_at = null where id = $1"
            }
        };

        sqlx::query(sql).bind(id).execute(executor).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Deactivate subscription", skip(executor))]
    pub async fn deactivate<'con>(
        executor: impl PgExecutor<'con>,
        audience: Audience,
        id: Uuid,
    ) -> sqlx::Result<()> {
        let sql = match audience {
            Audience::Newsletter => {
                "update newsletter_subscribers set is_active = false, unsubscribed_at = $2 where id = $1"
            }
            Audience::Service(_) => {
                "update service_subscriptions set is_active = false, unsubscribed_at = $2 where id = $1"
            }
        };

        sqlx::query(sql)
            .bind(id)
            .bind(Utc::now())
            .execute(executor)
            .await?;
        Ok(())
    }

    /// All active subscribers of an audience, oldest first
    #[tracing::instrument(name = "Fetch active recipients", skip(executor))]
    pub async fn fetch_active<'con>(
        executor: impl PgExecutor<'con>,
        audience: Audience,
    ) -> sqlx::Result<Vec<Recipient>> {
        let query = match audience {
            Audience::Newsletter => sqlx::query_as::<Postgres, Recipient>(
                r#"
                select id, email from newsletter_subscribers
                where is_active
                order by subscribed_at, id
                "#,
            ),
            Audience::Service(service) => sqlx::query_as::<Postgres, Recipient>(
                r#"
                select id, email from service_subscriptions
                where service_name = $1 and is_active
                order by subscribed_at, id
                "#,
            )
            .bind(service.as_str()),
        };

        query.fetch_all(executor).await
    }
}
