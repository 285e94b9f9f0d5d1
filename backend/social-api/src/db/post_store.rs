use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{with_deadline, PostStore};
use crate::error::{AppError, Result};
use crate::models::{FeedQuery, NewPost, Post, PostWithMetadata};

pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, post: NewPost) -> Result<Post> {
        with_deadline(
            sqlx::query_as::<_, Post>(
                r#"
                INSERT INTO posts (user_id, title, content, tags)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, title, content, tags, version, created_at, updated_at
                "#,
            )
            .bind(post.user_id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.tags)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_by_id(&self, post_id: Uuid) -> Result<Post> {
        let post = with_deadline(
            sqlx::query_as::<_, Post>(
                r#"
                SELECT id, user_id, title, content, tags, version, created_at, updated_at
                FROM posts
                WHERE id = $1
                "#,
            )
            .bind(post_id)
            .fetch_optional(&self.pool),
        )
        .await?;

        post.ok_or(AppError::NotFound)
    }

    async fn update(&self, post: &Post) -> Result<Post> {
        // The version predicate is the sole concurrency control: zero rows
        // means another writer advanced the version, or the row never
        // existed. Callers needing to tell those apart must re-fetch.
        let updated = with_deadline(
            sqlx::query_as::<_, Post>(
                r#"
                UPDATE posts
                SET title = $2, content = $3, version = version + 1, updated_at = NOW()
                WHERE id = $1 AND version = $4
                RETURNING id, user_id, title, content, tags, version, created_at, updated_at
                "#,
            )
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.version)
            .fetch_optional(&self.pool),
        )
        .await?;

        updated.ok_or(AppError::NotFound)
    }

    async fn delete(&self, post_id: Uuid) -> Result<()> {
        let result = with_deadline(
            sqlx::query("DELETE FROM posts WHERE id = $1")
                .bind(post_id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn get_user_feed(
        &self,
        user_id: Uuid,
        query: &FeedQuery,
    ) -> Result<Vec<PostWithMetadata>> {
        // Sort direction comes from a validated enum, never raw input.
        let sql = format!(
            r#"
            SELECT p.id, p.user_id, u.username, p.title, p.content, p.tags, p.version,
                   p.created_at, COUNT(c.id) AS comments_count
            FROM posts p
            JOIN followers f ON f.user_id = p.user_id AND f.follower_id = $1
            JOIN users u ON u.id = p.user_id
            LEFT JOIN comments c ON c.post_id = p.id
            WHERE ($4 = '' OR p.title ILIKE '%' || $4 || '%' OR p.content ILIKE '%' || $4 || '%')
              AND (cardinality($5::text[]) = 0 OR p.tags && $5::text[])
              AND ($6::timestamptz IS NULL OR p.created_at >= $6)
              AND ($7::timestamptz IS NULL OR p.created_at <= $7)
            GROUP BY p.id, u.username
            ORDER BY p.created_at {dir}
            LIMIT $2 OFFSET $3
            "#,
            dir = query.sort.as_sql(),
        );

        with_deadline(
            sqlx::query_as::<_, PostWithMetadata>(&sql)
                .bind(user_id)
                .bind(query.limit)
                .bind(query.offset)
                .bind(&query.search)
                .bind(&query.tags)
                .bind(query.since)
                .bind(query.until)
                .fetch_all(&self.pool),
        )
        .await
    }
}
