//! commsboard - Marketing-communications analytics dashboard backend
//!
//! This library provides the core functionality for the commsboard service:
//! weekly social, website and newsletter metrics, their storage, and the
//! rollup engine that turns raw records into dashboard figures.
//!
//! # Features
//! - **server**: HTTP API server (default)
//! - **cli**: Command-line interface (seed / summary / config)
//!
//! # Architecture
//! - `model`: Metric records and dimension types
//! - `rollup`: Pure aggregation functions (totals, growth, distribution, buckets)
//! - `storage`: SeaORM persistence with idempotent upserts
//! - `services`: Metric CRUD and dashboard query services
//! - `api`: HTTP handlers and middleware
//! - `interfaces`: Command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod model;
pub mod rollup;
#[cfg(feature = "server")]
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
