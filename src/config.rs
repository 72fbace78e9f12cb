use crate::dotenv;
use crate::error::Error;
use std::str::FromStr;

pub static HOST: &str = "HOST";
pub static PORT: &str = "PORT";
pub static DATABASE_URL: &str = "DATABASE_URL";
pub static MAX_CONNECTIONS: &str = "MAX_CONNECTIONS";
pub static JWT_SECRET: &str = "JWT_SECRET";
pub static TOKEN_TTL_DAYS: &str = "TOKEN_TTL_DAYS";
pub static ADMIN_USERNAME: &str = "ADMIN_USERNAME";
pub static ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";

const TOKEN_TTL_DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=3650;

#[derive(Debug, Clone)]
pub struct Admin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Without a database url the server keeps everything in memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub admin: Option<Admin>,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup(JWT_SECRET).ok_or_else(|| Error::ServerError(format!("environment variable {} not been set", JWT_SECRET)))?;
        let admin = match (lookup(ADMIN_USERNAME), lookup(ADMIN_PASSWORD)) {
            (Some(username), Some(password)) => Some(Admin { username, password }),
            (None, None) => None,
            _ => return Err(Error::ServerError(format!("{} and {} must be set together", ADMIN_USERNAME, ADMIN_PASSWORD))),
        };
        let token_ttl_days = parse_or(&lookup, TOKEN_TTL_DAYS, 30)?;
        if !TOKEN_TTL_DAYS_RANGE.contains(&token_ttl_days) {
            return Err(Error::ServerError(format!(
                "{} must be between {} and {}, got {}",
                TOKEN_TTL_DAYS,
                TOKEN_TTL_DAYS_RANGE.start(),
                TOKEN_TTL_DAYS_RANGE.end(),
                token_ttl_days
            )));
        }
        Ok(Self {
            host: lookup(HOST).unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, PORT, 8000)?,
            database_url: lookup(DATABASE_URL).filter(|url| !url.is_empty()),
            max_connections: parse_or(&lookup, MAX_CONNECTIONS, 5)?,
            jwt_secret,
            token_ttl_days,
            admin,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr<Err = std::num::ParseIntError>,
{
    match lookup(key) {
        Some(v) => Ok(v.trim().parse()?),
        None => Ok(default),
    }
}
