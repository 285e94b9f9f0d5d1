use actix_web::web;

use crate::handlers;
use crate::middleware::JwtAuth;

/// Route table. Registration and activation are public; everything else
/// sits behind the bearer-token middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .route("/health", web::get().to(handlers::health::health))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/token", web::post().to(handlers::auth::create_token)),
            )
            .service(
                web::scope("/users")
                    .route("/activate/{token}", web::put().to(handlers::users::activate))
                    .service(
                        web::scope("")
                            .wrap(JwtAuth)
                            .route("/feed", web::get().to(handlers::feed::get_user_feed))
                            .route("/{id}", web::get().to(handlers::users::get_user))
                            .route("/{id}/follow", web::put().to(handlers::users::follow))
                            .route("/{id}/unfollow", web::put().to(handlers::users::unfollow)),
                    ),
            )
            .service(
                web::scope("/posts")
                    .wrap(JwtAuth)
                    .route("", web::post().to(handlers::posts::create))
                    .route("/{id}", web::get().to(handlers::posts::get))
                    .route("/{id}", web::patch().to(handlers::posts::update))
                    .route("/{id}", web::delete().to(handlers::posts::delete)),
            ),
    );
}
