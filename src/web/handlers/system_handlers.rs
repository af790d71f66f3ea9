// src/web/handlers/system_handlers.rs
use crate::web::types::ErrorResponse;

use rocket::serde::json::Json;
use tracing::debug;

pub async fn health_handler() -> Json<&'static str> {
    debug!("Health check");
    Json("OK")
}

pub fn not_found_handler(path: &str) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        format!("No route for {}", path),
        "NOT_FOUND",
        vec![
            "GET /api/health".to_string(),
            "POST /api/scrape-jobs".to_string(),
            "POST /api/jobs/query".to_string(),
        ],
    ))
}
