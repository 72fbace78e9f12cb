use serde::Serialize;
use sqlx::FromRow;

pub const CHOICE_TEXT_MAX_LEN: usize = 200;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Choice {
    pub id: i32,
    pub question_id: i32,
    pub choice_text: String,
    pub votes: i32,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_id: i32,
    pub choice_text: String,
}

#[derive(Debug, Default)]
pub struct Query {
    pub question_id_eq: Option<i32>,
}
