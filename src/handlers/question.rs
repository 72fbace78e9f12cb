use crate::actix_web::{
    web::{Data, Json, Path},
    HttpRequest, HttpResponse,
};
use crate::context::UserInfo;
use crate::core::models::question::QuestionCreate;
use crate::core::ports::repository::Manager;
use crate::core::services::question::{self as service, Eligibility};
use crate::error::Error;
use crate::handlers::{expired, flash, redirect, FLASH};
use crate::response::{CreateResponse, DetailPage, IndexPage, ResultsPage};
use chrono::Utc;

pub static POLL_EXPIRES: &str = "poll expires";

pub async fn index<M>(req: HttpRequest, db: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut storer = db.db().await?;
    let latest_question_list = service::published_questions(&mut storer, Utc::now()).await?;
    let mut builder = HttpResponse::Ok();
    let mut messages = Vec::new();
    if let Some(c) = req.cookie(FLASH) {
        messages.push(c.value().to_owned());
        builder.cookie(expired(FLASH));
    }
    Ok(builder.json(IndexPage { latest_question_list, messages }))
}

/// The voting form. Questions outside their voting window bounce back to the index.
pub async fn vote_for_poll<M>(question_id: Path<i32>, db: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let question_id = question_id.into_inner();
    let mut storer = db.db().await?;
    match service::voteable_question(&mut storer, question_id, Utc::now()).await? {
        Eligibility::Open(question) => Ok(HttpResponse::Ok().json(DetailPage { question, error_message: None })),
        Eligibility::Closed => Ok(redirect("/list/").cookie(flash(POLL_EXPIRES)).finish()),
    }
}

pub async fn detail<M>(question_id: Path<i32>, db: Data<M>) -> Result<Json<DetailPage>, Error>
where
    M: Manager + 'static,
{
    let question_id = question_id.into_inner();
    let mut storer = db.db().await?;
    let question = service::question_detail(&mut storer, question_id, Utc::now()).await?;
    Ok(Json(DetailPage { question, error_message: None }))
}

pub async fn results<M>(user_info: Option<UserInfo>, question_id: Path<i32>, db: Data<M>) -> Result<Json<ResultsPage>, Error>
where
    M: Manager + 'static,
{
    let question_id = question_id.into_inner();
    let mut storer = db.db().await?;
    let (question, vote) = service::question_results(&mut storer, question_id, user_info.map(|u| u.id), Utc::now()).await?;
    Ok(Json(ResultsPage {
        question,
        user_exist: vote.is_some(),
        user_choice: vote.map(|v| v.choice_id),
    }))
}

pub async fn create<M>(user_info: UserInfo, Json(question): Json<QuestionCreate>, db: Data<M>) -> Result<Json<CreateResponse>, Error>
where
    M: Manager + 'static,
{
    let id = service::create_question(db.tx().await?, user_info.id, question).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn delete<M>(user_info: UserInfo, question_id: Path<i32>, db: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let question_id = question_id.into_inner();
    service::delete_question(db.tx().await?, user_info.id, question_id).await?;
    Ok(HttpResponse::Ok().finish())
}
