use actix_web::body::{BoxBody, MessageBody};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use colored::Colorize;
use common::jwt::AdminClaims;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::info;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

pub struct LoggerMiddleware {
    enabled: bool,
}

impl LoggerMiddleware {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Arc::new(service),
            enabled: self.enabled,
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Arc<S>,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Arc::clone(&self.service);
        if !self.enabled {
            return Box::pin(async move { srv.call(req).await.map(|res| res.map_into_boxed_body()) });
        }

        let method = req.method().to_string();
        let path = req.path().to_string();
        let params = query_params(req.query_string());
        let started = Instant::now();

        Box::pin(async move {
            let res = srv.call(req).await?;
            let elapsed_ms = started.elapsed().as_millis();
            let status_code = res.status().as_u16();

            let admin = res
                .request()
                .extensions()
                .get::<AdminClaims>()
                .map(|claims| claims.username.clone());

            let colored_status = match status_code {
                200..=299 => status_code.to_string().green(),
                300..=399 => status_code.to_string().yellow(),
                400..=499 => status_code.to_string().bright_red(),
                _ => status_code.to_string().red(),
            };

            let colored_method = match method.as_str() {
                "GET" => method.blue(),
                "POST" => method.yellow(),
                "PUT" => method.purple(),
                "DELETE" => method.red(),
                _ => method.normal(),
            };

            info!(
                "[{}] {} {} {} admin={} params={}",
                colored_status,
                colored_method,
                path.bright_white(),
                format!("({}ms)", elapsed_ms).bright_black(),
                admin.unwrap_or_else(|| "None".to_string()).bright_blue(),
                params.bright_cyan(),
            );

            Ok(res.map_into_boxed_body())
        })
    }
}

/// Renders the query string as `{key=value, ...}`, dropping anything that
/// looks like a phone number.
fn query_params(query_string: &str) -> String {
    let params: BTreeMap<&str, &str> = query_string
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "true")))
        .filter(|(key, _)| !key.contains("phone"))
        .collect();
    format!("{:?}", params)
}
