use std::fmt;

use sqlx::PgExecutor;

use uuid::Uuid;

/// Roles a user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct UserRolesRepo;

impl UserRolesRepo {
    #[tracing::instrument("Grant a role to a user", skip(executor))]
    pub async fn grant<'conn>(
        executor: impl PgExecutor<'conn>,
        user_id: Uuid,
        role: UserRole,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "insert into user_roles (user_id, role) values ($1, $2) on conflict (user_id, role) do nothing",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(executor)
        .await?;
        Ok(())
    }

    #[tracing::instrument("Check a user's role", skip(executor))]
    pub async fn has_role<'conn>(
        executor: impl PgExecutor<'conn>,
        user_id: Uuid,
        role: UserRole,
    ) -> sqlx::Result<bool> {
        sqlx::query_scalar(
            "select exists(select 1 from user_roles where user_id = $1 and role = $2)",
        )
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(executor)
        .await
    }
}
