//! Client library for the call-center quality-monitoring service: evaluation
//! scoring and validation, list queries, dashboard mapping, an authenticated
//! HTTP client, and the view state that drives it.

pub mod api;
pub mod calls;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod evaluations;
pub mod query;
pub mod session;
pub mod telemetry;
pub mod users;

mod wire;
