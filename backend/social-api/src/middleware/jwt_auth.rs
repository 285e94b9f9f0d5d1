/// Bearer-token authentication middleware.
///
/// Validates the token, loads the actor from the user directory and hands
/// it to handlers through the `AuthenticatedUser` extractor — an explicit
/// parameter in each handler signature rather than an ambient lookup.
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::error::AppError;
use crate::models::User;
use crate::security::token::JwtAuthenticator;
use crate::AppState;

/// The authenticated actor for the current request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

pub struct JwtAuth;

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("app state missing".to_string()))?;

            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned)
                .ok_or(AppError::Unauthorized)?;

            let token = auth_header
                .strip_prefix("Bearer ")
                .ok_or(AppError::Unauthorized)?;

            let claims = state.authenticator.validate(token)?;
            let user_id = JwtAuthenticator::subject(&claims)?;

            // A missing or inactive account reads the same as a bad token.
            let user = state
                .storage
                .users
                .get_by_id(user_id)
                .await
                .map_err(|_| AppError::Unauthorized)?;

            req.extensions_mut().insert(AuthenticatedUser(user));

            service.call(req).await
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(actor) => ready(Ok(actor)),
            None => ready(Err(AppError::Unauthorized.into())),
        }
    }
}
