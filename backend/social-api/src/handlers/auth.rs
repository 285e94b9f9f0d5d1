use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::error::Result;
use crate::models::{CreateTokenPayload, RegisterUserPayload};
use crate::AppState;

/// `POST /v1/auth/register`
///
/// Creates a pending account and returns it together with the one-time
/// activation token for out-of-band delivery.
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterUserPayload>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    payload.validate()?;

    let created = state.auth.register(payload).await?;

    Ok(HttpResponse::Created().json(created))
}

/// `POST /v1/auth/token`
pub async fn create_token(
    state: web::Data<AppState>,
    payload: web::Json<CreateTokenPayload>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    payload.validate()?;

    let token = state.auth.login(&payload.email, &payload.password).await?;

    Ok(HttpResponse::Created().json(json!({ "token": token })))
}
