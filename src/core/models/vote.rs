use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Vote {
    pub id: i32,
    pub question_id: i32,
    pub user_id: i32,
    pub choice_id: i32,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_id: i32,
    pub user_id: i32,
    pub choice_id: i32,
}

#[derive(Debug, Default)]
pub struct Query {
    pub user_id_eq: Option<i32>,
    pub question_id_eq: Option<i32>,
}

/// What a successful ballot did to the stored vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    Created,
    Changed { from: i32 },
    Unchanged,
}
