#![allow(async_fn_in_trait)]

extern crate actix_web;
extern crate anyhow;
extern crate chrono;
extern crate dotenv;
extern crate env_logger;
extern crate hex;
extern crate jsonwebtoken;
extern crate rand;
extern crate serde;
extern crate sha2;
extern crate sqlx;
extern crate thiserror;
extern crate tokio;

#[cfg(test)]
#[macro_use]
mod testing;

mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
pub mod request;
pub mod response;
mod routes;

use crate::core::models::user::Credentials;
use crate::core::ports::repository::Manager;
use crate::core::services::user::ensure_admin;
use actix_web::web::Data;
use actix_web::HttpServer;
use anyhow::Context;
use config::Config;
use database::{memory::MemoryManager, sqlx::PgSqlxManager};
use impls::tokener::jwt::JWT;
use middlewares::jwt::JWTMiddleware;

async fn serve<M>(config: Config, manager: M) -> anyhow::Result<()>
where
    M: Manager + Clone + Send + 'static,
{
    if let Some(admin) = &config.admin {
        let credentials = Credentials {
            username: admin.username.clone(),
            password: admin.password.clone(),
        };
        ensure_admin(manager.tx().await?, credentials).await.context("failed to create staff user")?;
    }
    let tokener = JWT::new(config.jwt_secret.as_bytes().to_owned(), chrono::Duration::days(config.token_ttl_days));
    log::info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(JWTMiddleware::new(tokener.clone()))
            .app_data(Data::new(manager.clone()))
            .app_data(Data::new(tokener.clone()))
            .configure(routes::configure::<M>)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env().context("invalid configuration")?;
    match config.database_url.clone() {
        Some(url) => {
            let manager = PgSqlxManager::connect(&url, config.max_connections).await.context("failed to connect to database")?;
            manager.migrate().await.context("failed to run migrations")?;
            serve(config, manager).await
        }
        None => {
            log::warn!("DATABASE_URL not set, keeping polls in memory");
            serve(config, MemoryManager::default()).await
        }
    }
}
