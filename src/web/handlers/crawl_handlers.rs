// src/web/handlers/crawl_handlers.rs
use crate::core::{DocumentFilter, DEFAULT_COLLECTION};
use crate::types::{RunParams, RunReport};
use crate::web::types::*;

use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

pub async fn scrape_jobs_handler(
    params: Option<Json<RunParams>>,
    state: &State<ServerState>,
) -> Result<Json<RunReport>, Custom<Json<ErrorResponse>>> {
    let params = params.map(Json::into_inner).unwrap_or_default();
    info!(
        "Crawl requested for '{}' pages {}..={}",
        params.search_query, params.start_page, params.end_page
    );

    let crawler = state.crawler.lock().await;
    match crawler.run(&params).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            error!("Crawl for '{}' failed: {}", params.search_query, e);
            Err(Custom(
                Status::InternalServerError,
                Json(ErrorResponse::new(
                    e.to_string(),
                    "SCRAPE_FAILED",
                    vec![
                        "Check that the browser can be launched".to_string(),
                        "Inspect the server log for failed pages".to_string(),
                    ],
                )),
            ))
        }
    }
}

pub async fn query_jobs_handler(
    request: Option<Json<JobQueryRequest>>,
    state: &State<ServerState>,
) -> Result<Json<JobQueryResponse>, Custom<Json<ErrorResponse>>> {
    let request = request.map(Json::into_inner).unwrap_or_default();
    let collection = request
        .collection
        .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

    let filter = DocumentFilter::from_value(&request.filter).map_err(|e| {
        warn!("Rejected job query filter: {:#}", e);
        Custom(
            Status::BadRequest,
            Json(ErrorResponse::new(
                format!("{:#}", e),
                "INVALID_FILTER",
                vec!["Use {\"field\": value} or {\"field\": {\"$regex\": \"...\"}}".to_string()],
            )),
        )
    })?;

    match state.store.query(&collection, &filter).await {
        Ok(documents) => Ok(Json(JobQueryResponse {
            success: true,
            count: documents.len(),
            documents,
        })),
        Err(e) => {
            error!("Query on {} failed: {:#}", collection, e);
            Err(Custom(
                Status::InternalServerError,
                Json(ErrorResponse::new(
                    format!("{:#}", e),
                    "STORE_ERROR",
                    vec!["Try again in a few moments".to_string()],
                )),
            ))
        }
    }
}
