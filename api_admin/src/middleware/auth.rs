use std::{future::Future, pin::Pin, sync::Arc};

use actix_session::SessionExt;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use chrono::Utc;
use common::{error::AppError, jwt};
use futures::future::{Ready, ok};

use crate::{services, state::AdminState};

/// Lets a request through only with a live admin session.
///
/// The token is read from `Authorization: Bearer` first and from the cookie
/// session second. On success the `AdminClaims` are stored in the request
/// extensions.
pub struct AdminAuthMiddleware {}

impl AdminAuthMiddleware {
    pub fn new() -> Self {
        AdminAuthMiddleware {}
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AdminAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdminAuthMiddlewareService {
            service: Arc::new(service),
        })
    }
}

pub struct AdminAuthMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::to_owned);
        let token = bearer.or_else(|| req.get_session().get::<String>("token").ok().flatten());

        let state = req
            .app_data::<web::Data<Arc<AdminState>>>()
            .map(|data| Arc::clone(data.get_ref()));
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = state else {
                return Ok(req.error_response(AppError::Internal(
                    "Admin state is not configured".to_string(),
                )));
            };
            let Some(token) = token else {
                return Ok(req.error_response(AppError::Unauthorized(
                    "No session token provided".to_string(),
                )));
            };

            let claims = match jwt::validate_jwt(&token, &state.jwt_config.secret) {
                Ok(claims) => claims,
                Err(e) => return Ok(req.error_response(e)),
            };
            if let Err(e) = services::auth::authorize(&state, &claims, Utc::now()).await {
                return Ok(req.error_response(e));
            }

            req.extensions_mut().insert(claims);
            srv.call(req).await.map(|res| res.map_into_boxed_body())
        })
    }
}
