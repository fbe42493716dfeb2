//! # Domain Layer
//!
//! Core recommendation models, the exercise vocabulary, and the advice
//! parser that gates model output.
//! This layer is independent of external frameworks and infrastructure.

pub mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
