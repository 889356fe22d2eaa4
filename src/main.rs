use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath, from_fn};
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi; // needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod repository;
mod routes;

use crate::auth::{jwt::TokenIssuer, service::AuthService};
use crate::config::Config;
use crate::db::init_db;
use crate::docs::ApiDoc;
use crate::error::{error_translator, translator::route_not_found};
use crate::repository::mysql::{
    MySqlAuthRepository, MySqlDepartments, MySqlEmployees, MySqlRoles, MySqlUserRoles, MySqlUsers,
};
use crate::routes::AppServices;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url, config.database_max_connections).await?;

    let issuer = TokenIssuer::new(config.jwt.clone());
    let services = AppServices {
        users: Arc::new(MySqlUsers::new(pool.clone())),
        roles: Arc::new(MySqlRoles::new(pool.clone())),
        user_roles: Arc::new(MySqlUserRoles::new(pool.clone())),
        departments: Arc::new(MySqlDepartments::new(pool.clone())),
        employees: Arc::new(MySqlEmployees::new(
            pool.clone(),
            config.employee_email_domain.clone(),
        )),
        auth: Arc::new(AuthService::new(
            Arc::new(MySqlAuthRepository::new(pool)),
            issuer.clone(),
        )),
        issuer,
    };

    let server_addr = config.server_addr.clone();
    info!(addr = %server_addr, "Binding HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(error_translator))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard matches the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .configure(|cfg| routes::configure(cfg, &config, services.clone()))
            .default_service(web::to(route_not_found))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await
    .context("HTTP server terminated with an error")
}
