#![deny(missing_docs)]
//! Spaceport server executable.
//!
//! Hosts the HTTP endpoints of the ship registry.

mod config;
mod db;
mod models;
mod openapi;
mod routes;
mod schema;
mod store;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use spaceport_core::{MemoryShipStore, SharedStore};
#[cfg(not(test))]
use std::sync::Arc;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::db::init_pool;
#[cfg(not(test))]
use crate::routes::{AppState, configure};
#[cfg(not(test))]
use crate::store::PgShipStore;

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = ServerConfig::from_env()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

    // Pool creation and migrations run before the async runtime starts.
    let store: SharedStore = match &config.database_url {
        Some(database_url) => Arc::new(PgShipStore::new(init_pool(
            database_url,
            config.pool_size,
        ))),
        None => {
            log::warn!("DATABASE_URL is not set; ships are kept in memory only");
            Arc::new(MemoryShipStore::new())
        }
    };
    let state = web::Data::new(AppState { store });

    let allowed_origins = config.allowed_origins.clone();
    let err_msg = format!("Can't bind {}:{}", &config.host, config.port);
    log::info!("listening on {}:{}", config.host, config.port);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((config.host, config.port))
        .expect(&err_msg)
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
