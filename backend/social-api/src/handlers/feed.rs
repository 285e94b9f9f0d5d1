use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::FeedQuery;
use crate::AppState;

/// `GET /v1/users/feed`
///
/// Posts authored by users the actor follows, filtered, sorted and
/// paginated per the query parameters.
pub async fn get_user_feed(
    state: web::Data<AppState>,
    actor: AuthenticatedUser,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    query.validate()?;

    let feed = state
        .storage
        .posts
        .get_user_feed(actor.0.id, &query)
        .await?;

    Ok(HttpResponse::Ok().json(feed))
}
