mod openai;
mod provider;

pub use openai::{OpenAIConfig, OpenAIProvider};
pub use provider::EmbeddingProvider;
