use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{classify, with_deadline, UserStore};
use crate::error::{AppError, Result};
use crate::models::{NewUser, Role, User};

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row for the role-joined user queries.
#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    role_id: i32,
    role_name: String,
    role_level: i32,
    role_description: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            is_active: row.is_active,
            role: Role {
                id: row.role_id,
                name: row.role_name,
                level: row.role_level,
                description: row.role_description,
            },
            created_at: row.created_at,
        }
    }
}

const USER_WITH_ROLE: &str = r#"
    SELECT u.id, u.username, u.email, u.password_hash, u.is_active, u.created_at,
           r.id AS role_id, r.name AS role_name, r.level AS role_level,
           r.description AS role_description
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

impl PgUserStore {
    async fn insert_user(
        tx: &mut Transaction<'_, Postgres>,
        user: &NewUser,
        role: &Role,
    ) -> Result<(Uuid, DateTime<Utc>)> {
        with_deadline(
            sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
                r#"
                INSERT INTO users (username, email, password_hash, role_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, created_at
                "#,
            )
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(role.id)
            .fetch_one(&mut **tx),
        )
        .await
    }

    async fn insert_invitation(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        with_deadline(
            sqlx::query(
                r#"
                INSERT INTO user_invitations (token_hash, user_id, expires_at)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(token_hash)
            .bind(user_id)
            .bind(expires_at)
            .execute(&mut **tx),
        )
        .await?;

        Ok(())
    }

    async fn delete_invitations(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> Result<()> {
        with_deadline(
            sqlx::query("DELETE FROM user_invitations WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut **tx),
        )
        .await?;

        Ok(())
    }

    async fn fetch_role(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Role> {
        let role = with_deadline(
            sqlx::query_as::<_, Role>(
                "SELECT id, name, level, description FROM roles WHERE name = $1",
            )
            .bind(name)
            .fetch_optional(&mut **tx),
        )
        .await?;

        role.ok_or_else(|| AppError::Internal(format!("unknown role: {name}")))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_and_invite(
        &self,
        user: NewUser,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<User> {
        // Dropping the transaction on any early return rolls it back; no
        // user-without-invitation state can persist.
        let mut tx = self.pool.begin().await.map_err(classify)?;

        let role = Self::fetch_role(&mut tx, &user.role_name).await?;
        let (id, created_at) = Self::insert_user(&mut tx, &user, &role).await?;
        Self::insert_invitation(&mut tx, id, token_hash, Utc::now() + ttl).await?;

        tx.commit().await.map_err(classify)?;

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            is_active: false,
            role,
            created_at,
        })
    }

    async fn activate(&self, token_hash: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        // Absent and expired invitations are indistinguishable here.
        let row = with_deadline(
            sqlx::query_as::<_, (Uuid,)>(
                r#"
                SELECT u.id
                FROM users u
                JOIN user_invitations ui ON ui.user_id = u.id
                WHERE ui.token_hash = $1 AND ui.expires_at > NOW()
                "#,
            )
            .bind(token_hash)
            .fetch_optional(&mut *tx),
        )
        .await?;

        let user_id = row.map(|(id,)| id).ok_or(AppError::NotFound)?;

        with_deadline(
            sqlx::query("UPDATE users SET is_active = TRUE WHERE id = $1")
                .bind(user_id)
                .execute(&mut *tx),
        )
        .await?;

        Self::delete_invitations(&mut tx, user_id).await?;

        tx.commit().await.map_err(classify)?;

        tracing::info!(%user_id, "user activated");
        Ok(())
    }

    async fn get_by_id(&self, user_id: Uuid) -> Result<User> {
        let query = format!("{USER_WITH_ROLE} WHERE u.id = $1 AND u.is_active = TRUE");

        let row = with_deadline(
            sqlx::query_as::<_, UserRow>(&query)
                .bind(user_id)
                .fetch_optional(&self.pool),
        )
        .await?;

        row.map(User::from).ok_or(AppError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        let query = format!("{USER_WITH_ROLE} WHERE u.email = $1 AND u.is_active = TRUE");

        let row = with_deadline(
            sqlx::query_as::<_, UserRow>(&query)
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await?;

        row.map(User::from).ok_or(AppError::NotFound)
    }

    async fn delete(&self, user_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(classify)?;

        Self::delete_invitations(&mut tx, user_id).await?;

        let result = with_deadline(
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user_id)
                .execute(&mut *tx),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        tx.commit().await.map_err(classify)?;
        Ok(())
    }

    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()> {
        with_deadline(
            sqlx::query("INSERT INTO followers (user_id, follower_id) VALUES ($1, $2)")
                .bind(followed_id)
                .bind(follower_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<()> {
        with_deadline(
            sqlx::query("DELETE FROM followers WHERE user_id = $1 AND follower_id = $2")
                .bind(followed_id)
                .bind(follower_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}
