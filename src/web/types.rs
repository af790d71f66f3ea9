// src/web/types.rs
use crate::core::{Document, JobStore};
use crate::pipeline::CrawlOrchestrator;
use rocket::serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared state of the HTTP server.
///
/// The orchestrator sits behind an async mutex: one crawl at a time, later
/// requests wait for the running one.
pub struct ServerState {
    pub crawler: Mutex<CrawlOrchestrator>,
    pub store: Arc<dyn JobStore>,
}

impl ServerState {
    pub fn new(crawler: CrawlOrchestrator, store: Arc<dyn JobStore>) -> Self {
        Self {
            crawler: Mutex::new(crawler),
            store,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: String, error_code: &str, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            error,
            error_code: error_code.to_string(),
            suggestions,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "rocket::serde", default)]
pub struct JobQueryRequest {
    pub collection: Option<String>,
    pub filter: Value,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct JobQueryResponse {
    pub success: bool,
    pub count: usize,
    pub documents: Vec<Document>,
}
