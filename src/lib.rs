//! Extraction-and-classification pipeline for Jordanian electronics
//! storefronts: a politeness-aware fetcher, a multi-candidate field
//! extractor, a heuristic category classifier, and an idempotent store
//! that deduplicates by canonical URL.

pub mod builder;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod scrapers;
pub mod storage;
