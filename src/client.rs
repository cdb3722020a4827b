mod chat_client;
mod email_client;

pub use chat_client::{ChatClient, ChatError, ChatMessage, Role};
pub use email_client::{Email, EmailClient};
