pub mod error;
pub mod message;
pub mod traits;
pub mod webhook;

pub use error::TutorError;
pub use message::{ChatMessage, Role};
pub use traits::{LlmProvider, LlmRequest, LlmResponse};
pub use webhook::{
    Button, RequestBody, ResponseBody, SessionInfo, WebhookRequest, WebhookResponse,
};
