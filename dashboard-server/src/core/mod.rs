//! Core module - server configuration, state and HTTP server
//!
//! # Module structure
//!
//! - [`Config`] - server configuration from environment
//! - [`ServerState`] - shared per-process state (config + store handle)
//! - [`Server`] - HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
