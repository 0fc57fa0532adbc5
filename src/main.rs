use std::sync::Arc;

use actix_web::HttpServer;
use anyhow::Context;

mod api;
mod auth;
mod bootstrap;
mod config;
mod db;
mod docs;
mod leave;
mod model;
mod routes;
mod store;

use config::Config;
use db::init_db;
use leave::RequestService;
use store::{LeaveStore, MemoryStore, MySqlStore};

use tracing::{info, warn};
use tracing_appender::rolling;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let store: Arc<dyn LeaveStore> = match &config.database_url {
        Some(url) => Arc::new(MySqlStore::new(init_db(url).await?)),
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let service = RequestService::new(store);

    if config.seed_default_users {
        bootstrap::seed_default_users(service.store())
            .await
            .context("Failed to seed default users")?;
    }

    if config.issue_dev_tokens {
        issue_dev_tokens(service.store(), &config).await?;
    }

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || routes::build_app(config.clone(), service.clone()))
        .bind(&server_addr)
        .with_context(|| format!("Failed to bind {server_addr}"))?
        .run()
        .await?;

    Ok(())
}

/// Logs a signed access token per stored user, for local testing without
/// an identity provider.
async fn issue_dev_tokens(store: &dyn LeaveStore, config: &Config) -> anyhow::Result<()> {
    for user in store.list_users().await? {
        let token = auth::jwt::generate_access_token(
            user.id,
            user.name.clone(),
            &config.jwt_secret,
            config.access_token_ttl,
        )?;
        warn!(user_id = user.id, role = %user.role, token = %token, "Issued development token");
    }
    Ok(())
}
