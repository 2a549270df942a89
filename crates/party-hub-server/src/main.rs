mod api;
mod catalog;
mod config;
mod error;
mod hub;
mod membership;
mod models;
mod openapi;
mod party;
mod playback;
mod queue_service;
mod registry;
mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::{CatalogGateway, HttpCatalog};
use crate::hub::BroadcastHub;
use crate::registry::{spawn_party_reaper, PartyRegistry};
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "party-hub-server")]
struct Args {
    /// HTTP bind address, e.g. 0.0.0.0:5000
    #[arg(long)]
    bind: Option<std::net::SocketAddr>,

    /// Optional server config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,actix_web=info,party_hub_server=info")
        }))
        .init();

    let cfg = match args.config.as_ref() {
        Some(path) => config::ServerConfig::load(path)?,
        None => config::ServerConfig::default(),
    };
    let bind = match args.bind {
        Some(addr) => addr,
        None => config::bind_from_config(&cfg)?
            .unwrap_or_else(|| "0.0.0.0:5000".parse().expect("default bind")),
    };
    let public_base_url = cfg
        .public_base_url
        .clone()
        .unwrap_or_else(|| format!("http://{bind}"));

    let catalog: Option<Arc<dyn CatalogGateway>> = match cfg.catalog.as_ref() {
        Some(catalog_cfg) => Some(Arc::new(HttpCatalog::new(catalog_cfg)?)),
        None => {
            tracing::warn!("no catalog configured; search will report the catalog unavailable");
            None
        }
    };

    let registry = PartyRegistry::new(cfg.code_length());
    let hub = BroadcastHub::new();
    let state = web::Data::new(AppState::new(
        registry.clone(),
        hub.clone(),
        catalog,
        public_base_url,
    ));

    spawn_party_reaper(
        registry,
        hub,
        Duration::from_secs(cfg.idle_ttl_sec()),
        Duration::from_secs(cfg.reap_interval_sec()),
    );

    tracing::info!(
        bind = %bind,
        code_length = cfg.code_length(),
        idle_ttl_sec = cfg.idle_ttl_sec(),
        "starting party-hub-server"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default().exclude("/health"))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", openapi::ApiDoc::openapi()),
            )
            .service(api::health::health)
            .service(api::create_party)
            .service(api::get_party)
            .service(api::join_party)
            .service(api::close_party)
            .service(api::queue_add)
            .service(api::queue_vote)
            .service(api::playback_next)
            .service(api::playback_ended)
            .service(api::search::search)
            .service(api::party_ws)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
