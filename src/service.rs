//! Application logic sitting between the controllers and the store/clients.

pub mod broadcast;
pub mod chat;
pub mod subscription;

pub use broadcast::{broadcast, Broadcast, BroadcastError, BroadcastReport, BATCH_SIZE};
pub use subscription::{subscribe, unsubscribe, SubscribeOutcome, UnsubscribeOutcome};
