use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{with_deadline, CommentStore};
use crate::error::Result;
use crate::models::Comment;

pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn get_by_post_id(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        with_deadline(
            sqlx::query_as::<_, Comment>(
                r#"
                SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
                FROM comments c
                JOIN users u ON u.id = c.user_id
                WHERE c.post_id = $1
                ORDER BY c.created_at DESC
                "#,
            )
            .bind(post_id)
            .fetch_all(&self.pool),
        )
        .await
    }
}
