mod sent_newsletters;
mod subscriptions;
mod user_roles;

pub use sent_newsletters::{NewSentNewsletter, SentNewsletter, SentNewsletterRepo};
pub use subscriptions::{Recipient, Subscription, SubscriptionRepo};
pub use user_roles::{UserRole, UserRolesRepo};
