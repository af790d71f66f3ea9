// src/types/mod.rs
pub mod job_listing;
pub mod report;

pub use job_listing::{
    Enrichment, Experience, JobListingRecord, MaxYears, SeniorityTag, NOT_AVAILABLE,
    UNBOUNDED_YEARS_SENTINEL,
};
pub use report::{PageFailure, PageSummary, RunOutcome, RunParams, RunPhase, RunReport};
