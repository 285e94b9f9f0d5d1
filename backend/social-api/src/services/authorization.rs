use std::sync::Arc;
use uuid::Uuid;

use crate::db::RoleStore;
use crate::error::{AppError, Result};
use crate::models::User;

/// Owner-guarded authorization: the resource owner may always act; anyone
/// else needs a role at or above the action's required role.
#[derive(Clone)]
pub struct AuthorizationService {
    roles: Arc<dyn RoleStore>,
}

impl AuthorizationService {
    pub fn new(roles: Arc<dyn RoleStore>) -> Self {
        Self { roles }
    }

    /// A role-store lookup failure is a server fault, never a denial; the
    /// caller must not map it to `Forbidden`.
    pub async fn is_authorized(
        &self,
        actor: &User,
        resource_owner_id: Uuid,
        required_role: &str,
    ) -> Result<bool> {
        if actor.id == resource_owner_id {
            return Ok(true);
        }

        let required = self
            .roles
            .get_by_name(required_role)
            .await
            .map_err(|err| match err {
                AppError::NotFound => {
                    AppError::Internal(format!("unknown role: {required_role}"))
                }
                other => other,
            })?;

        Ok(actor.role.level >= required.level)
    }
}
