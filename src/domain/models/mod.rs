mod exercise;
mod pain_description;
mod retry_policy;
mod vocabulary;

pub use exercise::*;
pub use pain_description::*;
pub use retry_policy::*;
pub use vocabulary::*;
