//! Archive API client library
//!
//! An async client for the institutional archive REST API: typed models,
//! the batched document and user mutations behind the admin bulk actions,
//! the list endpoints that feed the admin tables, and a TTL cache for their
//! results.

pub mod api;
pub mod auth;
pub mod cache;
pub mod error;
pub mod model;
pub mod response;

mod client;

pub use client::*;
pub use response::CacheStatus;
pub use response::Response;
