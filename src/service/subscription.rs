use sqlx::PgPool;

use crate::client::EmailClient;
use crate::domain::{Audience, EmailAddress};
use crate::repo::SubscriptionRepo;
use crate::templates::EmailTemplates;

/// What a subscribe request did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// An active subscription existed, nothing was written or sent
    AlreadySubscribed,
    /// An inactive subscription was switched back on
    Reactivated,
    /// A new subscription was stored
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsubscribeOutcome {
    Unsubscribed,
    NotSubscribed,
}

/// Subscribe `email` to `audience`.
///
/// The store is authoritative: once the subscription is persisted the call
/// succeeds, even if the confirmation email can't be delivered.
#[tracing::instrument(name = "Subscribe", skip(pool, email_client, templates))]
pub async fn subscribe(
    pool: &PgPool,
    email_client: &EmailClient,
    templates: &EmailTemplates,
    email: EmailAddress,
    audience: Audience,
) -> sqlx::Result<SubscribeOutcome> {
    let outcome = match SubscriptionRepo::find(pool, audience, &email).await? {
        Some(existing) if existing.is_active => return Ok(SubscribeOutcome::AlreadySubscribed),
        Some(existing) => {
            SubscriptionRepo::reactivate(pool, audience, existing.id).await?;
            SubscribeOutcome::Reactivated
        }
        None => match SubscriptionRepo::insert(pool, audience, &email).await? {
            Some(_) => SubscribeOutcome::Created,
            // Lost a race with an identical request
            None => return Ok(SubscribeOutcome::AlreadySubscribed),
        },
    };

    let confirmation = templates.confirmation(email, audience);
    if let Err(error) = email_client.send(&confirmation).await {
        tracing::warn!(
            error.cause_chain = ?error,
            "Failed to send confirmation email to {}",
            confirmation.recipient
        );
    }

    Ok(outcome)
}

/// Mark the subscription inactive, keeping the record
#[tracing::instrument(name = "Unsubscribe", skip(pool))]
pub async fn unsubscribe(
    pool: &PgPool,
    email: EmailAddress,
    audience: Audience,
) -> sqlx::Result<UnsubscribeOutcome> {
    match SubscriptionRepo::find(pool, audience, &email).await? {
        Some(existing) if existing.is_active => {
            SubscriptionRepo::deactivate(pool, audience, existing.id).await?;
            Ok(UnsubscribeOutcome::Unsubscribed)
        }
        _ => Ok(UnsubscribeOutcome::NotSubscribed),
    }
}
