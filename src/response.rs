use crate::core::models::question::{QuestionDetail, QuestionSummary};
use crate::serde::Serialize;

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub latest_question_list: Vec<QuestionSummary>,
    pub messages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DetailPage {
    pub question: QuestionDetail,
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultsPage {
    pub question: QuestionDetail,
    pub user_exist: bool,
    pub user_choice: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    pub id: i32,
}
