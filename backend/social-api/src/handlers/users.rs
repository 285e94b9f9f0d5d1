use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::AppState;

/// `GET /v1/users/{id}`
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = state.storage.users.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// `PUT /v1/users/activate/{token}`
pub async fn activate(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    state.auth.activate(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "user activated successfully" })))
}

/// `PUT /v1/users/{id}/follow`
///
/// The actor follows the user in the path; a duplicate edge is a 409.
pub async fn follow(
    state: web::Data<AppState>,
    actor: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let target = state.storage.users.get_by_id(path.into_inner()).await?;
    state.storage.users.follow(actor.0.id, target.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// `PUT /v1/users/{id}/unfollow`
pub async fn unfollow(
    state: web::Data<AppState>,
    actor: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let target = state.storage.users.get_by_id(path.into_inner()).await?;
    state.storage.users.unfollow(actor.0.id, target.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
