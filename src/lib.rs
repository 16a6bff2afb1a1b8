//! # Channel Relay Library
//!
//! A real-time group messaging relay. Authenticated clients hold a
//! WebSocket connection bound to one channel; every message is stamped,
//! stored in that channel's history and relayed to everyone currently
//! connected to the same channel.
//!
//! ## Architecture
//!
//! - **Domain Layer**: messages, accounts and the store contract
//! - **Application Layer**: account validation, message preparation, DTOs
//! - **Infrastructure Layer**: in-memory channel store and metrics
//! - **Presentation Layer**: REST handlers, the hub and session pumps
//!
//! ## Module Structure
//!
//! ```text
//! channel_relay/
//! +-- config/         Layered settings
//! +-- domain/         Message, Account, MessageRepository
//! +-- application/    Services and DTOs
//! +-- infrastructure/ Channel store, Prometheus metrics
//! +-- presentation/   HTTP routes, middleware, hub and sessions
//! +-- shared/         Errors, message ids
//! ```

// Configuration module
pub mod config;

// Domain layer
pub mod domain;

// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry
pub mod telemetry;
