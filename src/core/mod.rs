// src/core/mod.rs
//! Persistence for crawled listings

pub mod database;
pub mod job_store;

pub use database::Database;
pub use job_store::{
    seed_from_file, Document, DocumentFilter, JobStore, SqliteJobStore, DEFAULT_COLLECTION,
};
