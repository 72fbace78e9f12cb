use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const USERNAME_MAX_LEN: usize = 254;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub salt: String,
    pub is_staff: bool,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub username: String,
    pub password: String,
    pub salt: String,
    pub is_staff: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: i32,
    pub username: String,
    pub is_staff: bool,
    pub votes: Vec<crate::core::models::vote::Vote>,
}
