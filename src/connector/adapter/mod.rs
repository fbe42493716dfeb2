mod chat_client;
mod exercise_db_resolver;
mod llm_advice_generator;
mod mock_chat_client;
mod mock_media_resolver;
mod tokio_sleeper;
mod workers_ai_client;

pub use chat_client::*;
pub use exercise_db_resolver::*;
pub use llm_advice_generator::*;
pub use mock_chat_client::*;
pub use mock_media_resolver::*;
pub use tokio_sleeper::*;
pub use workers_ai_client::*;
