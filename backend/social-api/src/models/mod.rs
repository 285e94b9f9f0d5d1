use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Role in the precedence catalog. Levels form a total order: a higher
/// level always means more privilege.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub level: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Registration input for the user directory; the password arrives
/// already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role_name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Feed row: a post annotated with its author's username and a
/// denormalized comment count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostWithMetadata {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub comments_count: i64,
}

/// Comment read model; comments are created elsewhere.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserPayload {
    #[validate(length(min = 2, max = 50))]
    pub username: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 3, max = 72))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTokenPayload {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 3, max = 72))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000))]
    pub content: Option<String>,
}

/// Registration response: the only place the plaintext activation token
/// ever appears.
#[derive(Debug, Serialize)]
pub struct UserWithToken {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Feed query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Pagination, filters and sort for the user feed. Every field is
/// client-supplied and independently defaulted; validation bounds mirror
/// the API contract (limit 1-20, offset >= 0, at most 5 tags, search up
/// to 100 chars).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 20))]
    pub limit: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i64,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default, deserialize_with = "comma_separated")]
    #[validate(length(max = 5))]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub search: String,
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            sort: SortOrder::default(),
            tags: Vec::new(),
            search: String::new(),
            since: None,
            until: None,
        }
    }
}

fn default_limit() -> i64 {
    20
}

/// `?tags=a,b,c` arrives as one string in a query component.
fn comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| {
            s.split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default())
}
