use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use social_api::db::{self, Storage};
use social_api::security::token::JwtAuthenticator;
use social_api::services::{AuthService, AuthorizationService};
use social_api::{routes, telemetry, AppState, Config};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let pool = db::create_pool(&config.database).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let storage = Storage::new(pool.clone());
    let authenticator = Arc::new(JwtAuthenticator::new(
        &config.auth.jwt_secret,
        &config.auth.jwt_issuer,
        config.auth.jwt_ttl_secs,
    ));

    let state = AppState {
        db_pool: pool,
        auth: AuthService::new(
            storage.users.clone(),
            authenticator.clone(),
            chrono::Duration::seconds(config.invitation.ttl_secs),
        ),
        authz: AuthorizationService::new(storage.roles.clone()),
        storage,
        authenticator,
    };

    let addr = (config.app.host.clone(), config.app.port);
    tracing::info!(host = %config.app.host, port = config.app.port, "starting social-api");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
