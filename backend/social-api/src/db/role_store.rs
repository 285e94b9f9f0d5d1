use async_trait::async_trait;
use sqlx::PgPool;

use super::{with_deadline, RoleStore};
use crate::error::{AppError, Result};
use crate::models::Role;

pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn get_by_name(&self, name: &str) -> Result<Role> {
        let role = with_deadline(
            sqlx::query_as::<_, Role>(
                "SELECT id, name, level, description FROM roles WHERE name = $1",
            )
            .bind(name)
            .fetch_optional(&self.pool),
        )
        .await?;

        role.ok_or(AppError::NotFound)
    }
}
