use crate::actix_web::{self, Error, FromRequest, HttpMessage};
use std::future::{ready, Ready};

/// The authenticated caller. Extracting it from an anonymous request fails
/// with 401; use `Option<UserInfo>` where anonymous callers are welcome.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: i32,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<Self>() {
            ready(Ok(user.clone()))
        } else {
            ready(Err(actix_web::error::ErrorUnauthorized("login required")))
        }
    }
}
