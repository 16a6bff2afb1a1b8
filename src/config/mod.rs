//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use channel_relay::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Relay will listen on {}", settings.server_addr());
//! ```
//!
//! Accounts are configured as an array of tables:
//!
//! ```toml
//! [[accounts]]
//! username = "alice"
//! password = "password123"
//! channel = "general"
//! ```

mod settings;

pub use settings::*;
