use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use serde::Serialize;

use thiserror::Error;

use crate::client::ChatError;
use crate::service::BroadcastError;

pub type RestResult<T> = Result<T, RestError>;

/// Errors surfaced by the REST endpoints.
///
/// The `Display` text is what callers see in the `{error}` body, so the
/// internal variants only carry a generic message.
#[derive(Debug, Error)]
pub enum RestError {
    #[error("{0}")]
    ParseError(String),

    #[error("Unauthorized")]
    Unauthorized(#[source] anyhow::Error),

    #[error("Admin access required")]
    Forbidden,

    #[error("Rate limit exceeded. Please try again later.")]
    TooManyRequests,

    #[error("Service temporarily unavailable.")]
    PaymentRequired,

    #[error("{0}")]
    InternalError(String),

    #[error("Internal Server Error")]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl From<sqlx::Error> for RestError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error.cause_chain = ?e, "Database error");
        Self::InternalError("Database error".into())
    }
}

impl From<BroadcastError> for RestError {
    fn from(e: BroadcastError) -> Self {
        match e {
            BroadcastError::NoRecipients => Self::ParseError(e.to_string()),
            BroadcastError::Database(e) => e.into(),
        }
    }
}

impl From<ChatError> for RestError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::RateLimited => Self::TooManyRequests,
            ChatError::PaymentRequired => Self::PaymentRequired,
            e => {
                tracing::error!(error.cause_chain = ?e, "Chat gateway error");
                Self::InternalError("AI service error".into())
            }
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Other(e) = self {
            tracing::error!(error.cause_chain = ?e, "Unhandled error");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
