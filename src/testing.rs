use crate::core::models::{choice::Insert as ChoiceInsert, question::Insert as QuestionInsert, user::Credentials};
use crate::core::ports::repository::{ChoiceCommon, Manager, QuestionCommon};
use crate::core::services::user::signup;
use crate::database::memory::MemoryManager;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::JWT_TOKEN;
use actix_web::cookie::Cookie;
use chrono::{Duration, Utc};

pub const PASSWORD: &str = "password";

/// Builds the full application over `$manager` with the routes and auth middleware `main` uses.
macro_rules! test_app {
    ($manager:expr, $tokener:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(crate::middlewares::jwt::JWTMiddleware::new($tokener.clone()))
                .app_data(actix_web::web::Data::new($manager.clone()))
                .app_data(actix_web::web::Data::new($tokener.clone()))
                .configure(crate::routes::configure::<crate::database::memory::MemoryManager>),
        )
        .await
    };
}

pub fn tokener() -> JWT {
    JWT::new(b"test secret".to_vec(), Duration::days(1))
}

pub fn session(tokener: &JWT, uid: i32) -> Cookie<'static> {
    Cookie::new(JWT_TOKEN, tokener.token_for(uid).unwrap())
}

/// A question published `pub_days` from now that closes `end_days` from now.
pub async fn create_question(m: &MemoryManager, text: &str, pub_days: i64, end_days: i64) -> i32 {
    let now = Utc::now();
    let mut db = m.db().await.unwrap();
    QuestionCommon::insert(
        &mut db,
        QuestionInsert {
            question_text: text.into(),
            pub_date: now + Duration::days(pub_days),
            end_date: now + Duration::days(end_days),
        },
    )
    .await
    .unwrap()
}

pub async fn create_choice(m: &MemoryManager, question_id: i32, text: &str) -> i32 {
    let mut db = m.db().await.unwrap();
    ChoiceCommon::insert(
        &mut db,
        ChoiceInsert {
            question_id,
            choice_text: text.into(),
        },
    )
    .await
    .unwrap()
}

pub async fn create_user(m: &MemoryManager, username: &str, is_staff: bool) -> i32 {
    let credentials = Credentials {
        username: username.into(),
        password: PASSWORD.into(),
    };
    signup(m.tx().await.unwrap(), credentials, is_staff).await.unwrap()
}
