use actix_web::{post, web, HttpResponse, Responder};

use futures_util::TryStreamExt;

use serde::Deserialize;

use crate::client::{ChatClient, ChatMessage};
use crate::error::{RestError, RestResult};
use crate::service;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    messages: Vec<ChatMessage>,
}

/// Relay a visitor conversation to the chat gateway, streaming the answer back
#[tracing::instrument(name = "Chat assistant", skip(chat_client, body), fields(turns = body.messages.len()))]
#[post("/chat-assistant")]
async fn assistant(
    chat_client: web::Data<ChatClient>,
    body: web::Json<ChatBody>,
) -> RestResult<impl Responder> {
    let conversation =
        service::chat::conversation(body.into_inner().messages).map_err(RestError::ParseError)?;

    let response = chat_client.stream(&conversation).await?;

    let stream = response.bytes_stream().inspect_err(|error| {
        tracing::error!(error.cause_chain = ?error, "Chat stream interrupted");
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .streaming(stream))
}

/// Chat API endpoints
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(assistant);
}
