use actix_web::ResponseError;

use crate::actix_web::http::StatusCode;
use crate::jsonwebtoken::errors::Error as JsonWebTokenError;
use crate::sqlx::migrate::MigrateError;
use crate::thiserror::Error as ThisError;
use std::num;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    MigrateError(#[from] MigrateError),

    #[error("jwt error: {0}")]
    JWTError(#[from] JsonWebTokenError),

    #[error("parse int error: {0}")]
    ParseIntError(#[from] num::ParseIntError),

    #[error("business error: {0}")]
    BusinessError(String),

    #[error("username {0} already exists")]
    UsernameTaken(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("server error: {0}")]
    ServerError(String),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::DatabaseError(sqlx::Error::RowNotFound) | Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BusinessError(_) | Error::UsernameTaken(_) | Error::ParseIntError(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized | Error::JWTError(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::NotFound("question 1".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::DatabaseError(sqlx::Error::RowNotFound).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::BusinessError("bad".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::UsernameTaken("alice".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::ServerError("boom".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
