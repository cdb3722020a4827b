use std::future::Future;
use std::pin::Pin;

use actix_web::{dev, web, FromRequest, HttpRequest};

use anyhow::Context;

use sqlx::PgPool;

use uuid::Uuid;

use crate::crypto::SigningKey;
use crate::error::{RestError, RestResult};
use crate::repo::{UserRole, UserRolesRepo};

mod bearer;

/// Request guard for endpoints only administrators may call.
///
/// Resolves the bearer session to a user and requires the `admin` role.
#[derive(Debug)]
pub struct Administrator(Uuid);

impl FromRequest for Administrator {
    type Error = RestError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            // NOTE: Both must be registered with the application at startup
            let pool = req
                .app_data::<web::Data<PgPool>>()
                .context("PgPool not registered for application")?;
            let signing_key = req
                .app_data::<web::Data<SigningKey>>()
                .context("SigningKey not registered for application")?;

            let user_id = authenticate(&req, signing_key)?;
            authorize(pool, user_id).await?;

            Ok(Administrator(user_id))
        })
    }
}

impl AsRef<Uuid> for Administrator {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

fn authenticate(req: &HttpRequest, signing_key: &SigningKey) -> RestResult<Uuid> {
    let token = bearer::from_headers(req.headers()).map_err(RestError::Unauthorized)?;

    token
        .verify(signing_key.as_ref())
        .context("Failed to verify session token")
        .map_err(RestError::Unauthorized)
}

#[tracing::instrument("Authorize administrator", skip(pool))]
async fn authorize(pool: &PgPool, user_id: Uuid) -> RestResult<()> {
    if UserRolesRepo::has_role(pool, user_id, UserRole::Admin).await? {
        Ok(())
    } else {
        Err(RestError::Forbidden)
    }
}

#[cfg(test)]
impl From<Uuid> for Administrator {
    fn from(user_id: Uuid) -> Self {
        Self(user_id)
    }
}
