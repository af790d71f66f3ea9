// src/web/mod.rs
//! Thin HTTP boundary: trigger a crawl, query stored listings, health.

pub mod handlers;
pub mod types;

pub use types::*;

use crate::browser::ChromiumLauncher;
use crate::config::CrawlerConfig;
use crate::core::{JobStore, SqliteJobStore};
use crate::pipeline::CrawlOrchestrator;
use crate::types::{RunParams, RunReport};
use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_PORT: u16 = 3015;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    handlers::health_handler().await
}

#[post("/scrape-jobs", data = "<params>")]
pub async fn scrape_jobs(
    params: Option<Json<RunParams>>,
    state: &State<ServerState>,
) -> Result<Json<RunReport>, Custom<Json<ErrorResponse>>> {
    handlers::scrape_jobs_handler(params, state).await
}

#[post("/jobs/query", data = "<request>")]
pub async fn query_jobs(
    request: Option<Json<JobQueryRequest>>,
    state: &State<ServerState>,
) -> Result<Json<JobQueryResponse>, Custom<Json<ErrorResponse>>> {
    handlers::query_jobs_handler(request, state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(404)]
pub fn not_found(request: &Request<'_>) -> Json<ErrorResponse> {
    handlers::not_found_handler(request.uri().path().as_str())
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR",
        vec!["Try again in a few moments".to_string()],
    ))
}

/// Assemble the server around already-built state.
pub fn build_rocket(state: ServerState, port: u16) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register("/api", catchers![not_found, internal_error])
        .mount("/api", routes![health, scrape_jobs, query_jobs, options])
}

// Main server start function
pub async fn start_web_server(config: CrawlerConfig, port: u16) -> Result<()> {
    config.ensure_directories().await?;

    let store: Arc<dyn JobStore> = Arc::new(SqliteJobStore::open(&config.database_path).await?);
    let launcher = Arc::new(ChromiumLauncher::new(&config));
    let crawler = CrawlOrchestrator::new(config, launcher)?;

    info!("Starting job crawler API server on http://0.0.0.0:{}", port);
    info!("Data directory: {}", crawler.config().data_dir.display());

    let _rocket = build_rocket(ServerState::new(crawler, store), port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("HTTP server stopped with an error")?;

    Ok(())
}
