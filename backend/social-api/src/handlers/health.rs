use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::AppState;

/// `GET /v1/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.db_pool).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "service": "social-api",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "service": "social-api",
            }))
        }
    }
}
