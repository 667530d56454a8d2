use std::sync::Arc;

use salvo::{listener::TcpListener, Server};

use config::env_var;
use infra::{
    database::connection,
    router,
    service::security::{Argon2HashService, JWTEncryptionService},
};

mod app;
mod base;
mod config;
mod domain;
mod error;
mod infra;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let pool = connection::create_sqlx_pool().await;
    let hash_service = Arc::new(Argon2HashService::new());
    let token_service = Arc::new(JWTEncryptionService::new(env_var::get().token_key.clone()));

    let address = format!("0.0.0.0:{}", env_var::get().port);
    let listener = TcpListener::bind(&address);
    Server::new(listener)
        .serve(router::app(&pool, hash_service, token_service))
        .await;
}
