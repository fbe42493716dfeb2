//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completions (Cloudflare Workers AI, or an offline mock)
//! - Demonstration media (ExerciseDB, or an offline mock)
//! - Entry points (CLI router and the HTTP API)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::{Container, ContainerConfig, Router};
