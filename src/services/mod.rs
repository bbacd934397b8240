// src/services/mod.rs
//
// Services Module - the consistency engines and the catalog facade

pub mod aggregates;
pub mod cascade;
pub mod catalog_service;
pub mod integrity;
pub mod recompute_queue;


pub use aggregates::AggregateEngine;
pub use cascade::{CascadeEngine, CascadeReport};
pub use catalog_service::{CatalogRepositories, CatalogService, RecomputeSummary};
pub use integrity::IntegrityValidator;
pub use recompute_queue::{RecomputeMode, RecomputeQueue};
