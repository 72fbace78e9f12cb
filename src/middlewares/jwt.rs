use crate::actix_web::{
    dev::{Service, ServiceRequest, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use crate::context::UserInfo;
use crate::impls::tokener::jwt::JWT;
use std::future::{ready, Future, Ready};
use std::pin::Pin;

pub static JWT_TOKEN: &str = "JWT_TOKEN";

/// Attaches a `UserInfo` to requests that carry a valid token, either in the
/// `JWT_TOKEN` cookie or as an `Authorization: Bearer` header. Everything else
/// passes through as anonymous; handlers decide whether that is acceptable.
pub(crate) struct JWTMiddleware {
    tokener: JWT,
}

impl JWTMiddleware {
    pub fn new(tokener: JWT) -> Self {
        Self { tokener }
    }
}

impl<S> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JWTService {
            tokener: self.tokener.clone(),
            next_service: service,
        }))
    }
}

pub struct JWTService<S> {
    tokener: JWT,
    next_service: S,
}

fn bearer(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(JWT_TOKEN) {
        return Some(cookie.value().to_owned());
    }
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(|t| t.trim().to_owned())
}

impl<S> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = bearer(&req) {
            match self.tokener.user_id(&token) {
                Ok(id) => {
                    req.extensions_mut().insert(UserInfo { id });
                }
                Err(e) => log::debug!("ignoring session token: {}", e),
            }
        }
        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            let resp = res_fut.await.map_err(|e| e.into())?;
            Ok(resp)
        })
    }
}
