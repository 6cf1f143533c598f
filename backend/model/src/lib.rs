//! Model Client: turns a prompt into generated text via a chat-completion
//! backend, with generation parameters fixed by configuration.

pub mod client;
pub mod providers;

pub use client::{ModelClient, Prompt, EMPTY_ANSWER_FALLBACK};
pub use providers::mock::MockProvider;
pub use providers::openai::OpenAiProvider;
