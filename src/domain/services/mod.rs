//! Domain services containing core business logic.

mod advice_parser;

pub use advice_parser::*;
