pub mod question;
pub mod vote;

use actix_web::{
    cookie::{time::OffsetDateTime, Cookie, CookieBuilder},
    http::header::LOCATION,
    HttpResponseBuilder,
};

use crate::actix_web::{
    web::{Data, Form, Json},
    HttpResponse,
};
use crate::context::UserInfo;
use crate::core::models::user::{Credentials, Profile};
use crate::core::ports::repository::Manager;
use crate::core::services::user;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::JWT_TOKEN;
use crate::response::LoginPage;

pub static FLASH: &str = "FLASH";
pub static LOGIN_ERROR: &str = "Please enter a correct username and password.";

pub(crate) fn redirect(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::Found();
    builder.insert_header((LOCATION, location));
    builder
}

pub(crate) fn flash(message: &str) -> Cookie<'static> {
    CookieBuilder::new(FLASH, message.to_owned()).path("/").finish()
}

pub(crate) fn expired(name: &'static str) -> Cookie<'static> {
    CookieBuilder::new(name, "").path("/").expires(OffsetDateTime::now_utc()).finish()
}

pub async fn login_page(user_info: Option<UserInfo>) -> HttpResponse {
    if user_info.is_some() {
        return redirect("/list/").finish();
    }
    HttpResponse::Ok().json(LoginPage { error_message: None })
}

pub async fn login<M>(Form(credentials): Form<Credentials>, db: Data<M>, tokener: Data<JWT>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut storer = db.db().await?;
    match user::authenticate(&mut storer, &credentials).await? {
        Some(u) => {
            let token = tokener.token_for(u.id)?;
            log::info!("user {} logged in", u.id);
            Ok(redirect("/list/")
                .cookie(CookieBuilder::new(JWT_TOKEN, token).path("/").http_only(true).finish())
                .finish())
        }
        None => {
            log::warn!("failed login attempt for {}", credentials.username);
            Ok(HttpResponse::Ok().json(LoginPage {
                error_message: Some(LOGIN_ERROR.into()),
            }))
        }
    }
}

pub async fn signup<M>(Form(credentials): Form<Credentials>, db: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let id = user::signup(db.tx().await?, credentials, false).await?;
    log::info!("user {} signed up", id);
    Ok(redirect("/").finish())
}

pub async fn logout() -> HttpResponse {
    redirect("/").cookie(expired(JWT_TOKEN)).finish()
}

pub async fn account<M>(user_info: UserInfo, db: Data<M>) -> Result<Json<Profile>, Error>
where
    M: Manager + 'static,
{
    let mut storer = db.db().await?;
    let profile = user::profile(&mut storer, user_info.id).await?;
    Ok(Json(profile))
}
