//! konj-core: item store, score cache, bucketing and drill scheduler.
//!
//! This crate holds everything behind the `konj` command line: parsing
//! drill tables, persisting per-item scores, splitting items into difficulty
//! buckets, and running an interactive session over a [`traits::Console`].

pub mod cache;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod score;
pub mod statistics;
pub mod traits;
