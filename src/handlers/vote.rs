use crate::actix_web::{
    web::{Data, Form, Path},
    HttpResponse,
};
use crate::context::UserInfo;
use crate::core::ports::repository::Manager;
use crate::core::services::vote::{cast_vote, Ballot};
use crate::error::Error;
use crate::handlers::question::POLL_EXPIRES;
use crate::handlers::{flash, redirect};
use crate::request::VoteForm;
use crate::response::DetailPage;
use chrono::Utc;

pub static NO_CHOICE: &str = "You didn't select a choice.";

/// An unreadable or missing form body counts as no choice.
pub async fn vote<M>(user_info: UserInfo, question_id: Path<i32>, form: Option<Form<VoteForm>>, db: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let question_id = question_id.into_inner();
    let choice_id = form.and_then(|Form(f)| f.choice_id());
    match cast_vote(db.tx().await?, user_info.id, question_id, choice_id, Utc::now()).await? {
        Ballot::Counted(_) => Ok(redirect(&format!("/{}/results/", question_id)).finish()),
        Ballot::NoChoice(question) => Ok(HttpResponse::Ok().json(DetailPage {
            question,
            error_message: Some(NO_CHOICE.into()),
        })),
        Ballot::Closed => Ok(redirect("/list/").cookie(flash(POLL_EXPIRES)).finish()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::memory::MemoryManager;
    use crate::testing::{create_choice, create_question, create_user, session, tokener};
    use actix_web::{
        http::{header::LOCATION, StatusCode},
        test,
    };
    use serde_json::Value;

    fn votes(body: &Value) -> Vec<i64> {
        body["question"]["choices"].as_array().unwrap().iter().map(|c| c["votes"].as_i64().unwrap()).collect()
    }

    #[actix_web::test]
    async fn test_vote_requires_login() {
        let m = MemoryManager::default();
        let jwt = tokener();
        let qid = create_question(&m, "Open", -1, 1).await;
        let cid = create_choice(&m, qid, "a").await;
        let app = test_app!(m, jwt);
        let req = test::TestRequest::post()
            .uri(&format!("/{}/vote/", qid))
            .set_form([("choice", cid.to_string())])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_vote_without_choice_redisplays_form() {
        let m = MemoryManager::default();
        let jwt = tokener();
        let uid = create_user(&m, "voter", false).await;
        let qid = create_question(&m, "Open", -1, 1).await;
        create_choice(&m, qid, "a").await;
        let app = test_app!(m, jwt);

        let empty: [(&str, &str); 0] = [];
        for form in [vec![("choice", "")], vec![("choice", "bogus")], vec![("choice", "12345")], empty.to_vec()] {
            let req = test::TestRequest::post()
                .uri(&format!("/{}/vote/", qid))
                .cookie(session(&jwt, uid))
                .set_form(form)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error_message"], NO_CHOICE);
            assert_eq!(votes(&body), vec![0]);
        }
    }

    #[actix_web::test]
    async fn test_vote_without_body_redisplays_form() {
        let m = MemoryManager::default();
        let jwt = tokener();
        let uid = create_user(&m, "voter", false).await;
        let qid = create_question(&m, "Open", -1, 1).await;
        create_choice(&m, qid, "a").await;
        let app = test_app!(m, jwt);

        let req = test::TestRequest::post().uri(&format!("/{}/vote/", qid)).cookie(session(&jwt, uid)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_message"], NO_CHOICE);
        assert_eq!(votes(&body), vec![0]);

        let req = test::TestRequest::post()
            .uri(&format!("/{}/vote/", qid))
            .cookie(session(&jwt, uid))
            .insert_header(("Content-Type", "application/json"))
            .set_payload(r#"{"choice": "1"}"#)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error_message"], NO_CHOICE);
    }

    #[actix_web::test]
    async fn test_vote_redirects_to_results() {
        let m = MemoryManager::default();
        let jwt = tokener();
        let uid = create_user(&m, "voter", false).await;
        let qid = create_question(&m, "Open", -1, 1).await;
        let a = create_choice(&m, qid, "a").await;
        let b = create_choice(&m, qid, "b").await;
        let app = test_app!(m, jwt);

        let req = test::TestRequest::post()
            .uri(&format!("/{}/vote/", qid))
            .cookie(session(&jwt, uid))
            .set_form([("choice", a.to_string())])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(LOCATION).unwrap().to_str().unwrap(), format!("/{}/results/", qid));

        let req = test::TestRequest::get().uri(&format!("/{}/results/", qid)).cookie(session(&jwt, uid)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user_exist"], true);
        assert_eq!(body["user_choice"], a);
        assert_eq!(votes(&body), vec![1, 0]);

        let req = test::TestRequest::post()
            .uri(&format!("/{}/vote/", qid))
            .cookie(session(&jwt, uid))
            .set_form([("choice", b.to_string())])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);

        let req = test::TestRequest::get().uri(&format!("/{}/results/", qid)).cookie(session(&jwt, uid)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user_choice"], b);
        assert_eq!(votes(&body), vec![0, 1]);

        let req = test::TestRequest::get().uri("/account/").cookie(session(&jwt, uid)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["votes"].as_array().unwrap().len(), 1);
        assert_eq!(body["votes"][0]["choice_id"], b);
    }

    #[actix_web::test]
    async fn test_vote_on_expired_question() {
        let m = MemoryManager::default();
        let jwt = tokener();
        let uid = create_user(&m, "voter", false).await;
        let qid = create_question(&m, "Expired", -7, -5).await;
        let cid = create_choice(&m, qid, "a").await;
        let app = test_app!(m, jwt);

        let req = test::TestRequest::post()
            .uri(&format!("/{}/vote/", qid))
            .cookie(session(&jwt, uid))
            .set_form([("choice", cid.to_string())])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/list/");

        let req = test::TestRequest::get().uri(&format!("/{}/results/", qid)).cookie(session(&jwt, uid)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user_exist"], false);
        assert_eq!(votes(&body), vec![0]);
    }

    #[actix_web::test]
    async fn test_vote_on_unknown_question() {
        let m = MemoryManager::default();
        let jwt = tokener();
        let uid = create_user(&m, "voter", false).await;
        let app = test_app!(m, jwt);
        let req = test::TestRequest::post()
            .uri("/404/vote/")
            .cookie(session(&jwt, uid))
            .set_form([("choice", "1")])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
