use crate::core::models::choice::Choice;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

pub const QUESTION_TEXT_MAX_LEN: usize = 200;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Question {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl Question {
    /// Published within the day before `now`. A question scheduled for later is not recent.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) <= self.pub_date && self.pub_date <= now
    }

    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        now >= self.pub_date
    }

    /// Both ends of the window are inclusive.
    pub fn can_vote(&self, now: DateTime<Utc>) -> bool {
        self.pub_date <= now && now <= self.end_date
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.question_text)
    }
}

/// One row of the index page.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub was_published_recently: bool,
}

impl QuestionSummary {
    pub fn new(question: Question, now: DateTime<Utc>) -> Self {
        let was_published_recently = question.was_published_recently(now);
        Self {
            id: question.id,
            question_text: question.question_text,
            pub_date: question.pub_date,
            end_date: question.end_date,
            was_published_recently,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    pub id: i32,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub choices: Vec<Choice>,
}

impl QuestionDetail {
    pub fn new(question: Question, choices: Vec<Choice>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            pub_date: question.pub_date,
            end_date: question.end_date,
            choices,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionCreate {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Query {
    pub pub_date_lte: Option<DateTime<Utc>>,
}
