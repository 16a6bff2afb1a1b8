//! Infrastructure Layer
//!
//! - In-memory, channel-partitioned message store
//! - Prometheus metrics registry

pub mod metrics;
pub mod repositories;
