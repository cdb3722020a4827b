use sqlx::PgPool;

use uuid::Uuid;

use crate::client::EmailClient;
use crate::domain::{Audience, EmailAddress};
use crate::repo::{NewSentNewsletter, SentNewsletterRepo, SubscriptionRepo};
use crate::templates::EmailTemplates;

/// Recipients are walked in groups of this size, for progress logging
pub const BATCH_SIZE: usize = 50;

/// A newsletter issue to send
#[derive(Debug)]
pub struct Broadcast {
    pub subject: String,
    pub content: String,
    pub audience: Audience,
    /// The administrator sending it
    pub sent_by: Uuid,
}

/// Tally of a finished broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// `None` when the history row could not be written
    pub history_id: Option<Uuid>,
    pub sent: usize,
    pub failed: usize,
}

impl BroadcastReport {
    pub fn message(&self) -> String {
        if self.failed > 0 {
            format!(
                "Newsletter sent to {} subscribers, {} failed",
                self.sent, self.failed
            )
        } else {
            format!("Newsletter sent to {} subscribers", self.sent)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("No subscribers found")]
    NoRecipients,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Send one email per active recipient of the broadcast's audience.
///
/// Sends are sequential and a failed send never stops the rest. One history
/// row is written once every recipient was tried. Failing to write it is
/// logged but still reports the sends, they can't be taken back.
#[tracing::instrument(
    name = "Broadcast a newsletter",
    skip(pool, email_client, templates, broadcast),
    fields(audience = %broadcast.audience, sent_by = %broadcast.sent_by)
)]
pub async fn broadcast(
    pool: &PgPool,
    email_client: &EmailClient,
    templates: &EmailTemplates,
    broadcast: &Broadcast,
) -> Result<BroadcastReport, BroadcastError> {
    let recipients = SubscriptionRepo::fetch_active(pool, broadcast.audience).await?;
    if recipients.is_empty() {
        return Err(BroadcastError::NoRecipients);
    }

    let mut sent = 0usize;
    let mut failed = 0usize;

    for (batch_number, batch) in recipients.chunks(BATCH_SIZE).enumerate() {
        tracing::debug!(
            batch = batch_number + 1,
            size = batch.len(),
            "Sending newsletter batch"
        );

        for recipient in batch {
            let address = match recipient.email.parse::<EmailAddress>() {
                Ok(address) => address,
                Err(error) => {
                    tracing::warn!(
                        error,
                        "Skipping an invalid stored subscriber (id: {}, email: {})",
                        recipient.id,
                        recipient.email
                    );
                    failed += 1;
                    continue;
                }
            };

            let email = templates.newsletter(
                address,
                &broadcast.subject,
                &broadcast.content,
                broadcast.audience,
            );
            match email_client.send(&email).await {
                Ok(()) => sent += 1,
                Err(error) => {
                    tracing::error!(
                        error.cause_chain = ?error,
                        "Failed to send newsletter to {}",
                        recipient.email
                    );
                    failed += 1;
                }
            }
        }
    }

    let service_filter = broadcast.audience.service();
    let history = SentNewsletterRepo::insert(
        pool,
        &NewSentNewsletter {
            subject: &broadcast.subject,
            content: &broadcast.content,
            service_filter: service_filter.as_ref().map(|s| s.as_str()),
            sent_by: broadcast.sent_by,
            recipient_count: i32::try_from(sent).unwrap_or(i32::MAX),
        },
    )
    .await;
    let history_id = match history {
        Ok(id) => Some(id),
        Err(error) => {
            tracing::error!(
                error.cause_chain = ?error,
                sent,
                failed,
                "Failed to record sent newsletter"
            );
            None
        }
    };

    tracing::info!(sent, failed, "Newsletter broadcast finished");

    Ok(BroadcastReport {
        history_id,
        sent,
        failed,
    })
}
