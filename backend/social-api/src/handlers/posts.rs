use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::{Comment, CreatePostPayload, NewPost, Post, UpdatePostPayload};
use crate::AppState;

/// Minimum role to mutate another user's post.
const EDIT_ROLE: &str = "moderator";
const DELETE_ROLE: &str = "admin";

#[derive(Serialize)]
struct PostDetail {
    #[serde(flatten)]
    post: Post,
    comments: Vec<Comment>,
}

/// `POST /v1/posts`
pub async fn create(
    state: web::Data<AppState>,
    actor: AuthenticatedUser,
    payload: web::Json<CreatePostPayload>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    payload.validate()?;

    let post = state
        .storage
        .posts
        .create(NewPost {
            user_id: actor.0.id,
            title: payload.title,
            content: payload.content,
            tags: payload.tags,
        })
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// `GET /v1/posts/{id}`
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let post = state.storage.posts.get_by_id(path.into_inner()).await?;
    let comments = state.storage.comments.get_by_post_id(post.id).await?;

    Ok(HttpResponse::Ok().json(PostDetail { post, comments }))
}

/// `PATCH /v1/posts/{id}`
///
/// The stored version read here is the one the conditional update is
/// keyed on; a concurrent writer makes this request fail with 404.
pub async fn update(
    state: web::Data<AppState>,
    actor: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<UpdatePostPayload>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    payload.validate()?;

    let mut post = state.storage.posts.get_by_id(path.into_inner()).await?;

    if !state
        .authz
        .is_authorized(&actor.0, post.user_id, EDIT_ROLE)
        .await?
    {
        return Err(AppError::Forbidden);
    }

    if let Some(title) = payload.title {
        post.title = title;
    }
    if let Some(content) = payload.content {
        post.content = content;
    }

    let updated = state.storage.posts.update(&post).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// `DELETE /v1/posts/{id}`
pub async fn delete(
    state: web::Data<AppState>,
    actor: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = state.storage.posts.get_by_id(path.into_inner()).await?;

    if !state
        .authz
        .is_authorized(&actor.0, post.user_id, DELETE_ROLE)
        .await?
    {
        return Err(AppError::Forbidden);
    }

    state.storage.posts.delete(post.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "post deleted successfully" })))
}
