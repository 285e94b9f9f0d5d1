use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::db::{RoleStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{NewUser, Role, User};

pub const TEST_PASSWORD: &str = "hunter2!";

pub fn role(name: &str, level: i32) -> Role {
    Role {
        id: level,
        name: name.to_string(),
        level,
        description: None,
    }
}

pub fn user_with_role(name: &str, level: i32) -> User {
    User {
        id: Uuid::new_v4(),
        username: format!("{name}-actor"),
        email: format!("{name}@example.com"),
        password_hash: String::new(),
        is_active: true,
        role: role(name, level),
        created_at: Utc::now(),
    }
}

/// In-memory role catalog mirroring the seeded migration.
pub struct StubRoleStore {
    roles: HashMap<String, Role>,
}

impl StubRoleStore {
    pub fn with_catalog() -> Self {
        let mut roles = HashMap::new();
        for (name, level) in [("user", 1), ("moderator", 2), ("admin", 3)] {
            roles.insert(name.to_string(), role(name, level));
        }
        Self { roles }
    }
}

#[async_trait]
impl RoleStore for StubRoleStore {
    async fn get_by_name(&self, name: &str) -> Result<Role> {
        self.roles.get(name).cloned().ok_or(AppError::NotFound)
    }
}

/// Role store whose backend is down.
pub struct FailingRoleStore;

#[async_trait]
impl RoleStore for FailingRoleStore {
    async fn get_by_name(&self, _name: &str) -> Result<Role> {
        Err(AppError::Database("connection refused".to_string()))
    }
}

/// Minimal user directory double that records what the invitation
/// lifecycle hands to storage.
#[derive(Default)]
pub struct RecordingUserStore {
    pub invited: Mutex<Vec<(NewUser, String)>>,
    pub known: Mutex<HashMap<String, User>>,
}

impl RecordingUserStore {
    pub fn with_user(user: User) -> Self {
        let store = Self::default();
        store
            .known
            .lock()
            .unwrap()
            .insert(user.email.clone(), user);
        store
    }
}

#[async_trait]
impl UserStore for RecordingUserStore {
    async fn create_and_invite(
        &self,
        user: NewUser,
        token_hash: &str,
        _ttl: Duration,
    ) -> Result<User> {
        let created = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_active: false,
            role: role(&user.role_name, 1),
            created_at: Utc::now(),
        };
        self.invited
            .lock()
            .unwrap()
            .push((user, token_hash.to_string()));
        Ok(created)
    }

    async fn activate(&self, _token_hash: &str) -> Result<()> {
        Ok(())
    }

    async fn get_by_id(&self, _user_id: Uuid) -> Result<User> {
        Err(AppError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        self.known
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn delete(&self, _user_id: Uuid) -> Result<()> {
        Ok(())
    }

    async fn follow(&self, _follower_id: Uuid, _followed_id: Uuid) -> Result<()> {
        Ok(())
    }

    async fn unfollow(&self, _follower_id: Uuid, _followed_id: Uuid) -> Result<()> {
        Ok(())
    }
}
