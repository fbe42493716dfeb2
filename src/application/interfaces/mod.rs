mod advice_generator;
mod backoff_sleeper;
mod media_resolver;

pub use advice_generator::*;
pub use backoff_sleeper::*;
pub use media_resolver::*;
