use serde::Serialize;

pub mod chat;
pub mod newsletters;
pub mod subscriptions;

/// Body of a successful request that only needs to report back
#[derive(Debug, Serialize)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

impl Acknowledgement {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
