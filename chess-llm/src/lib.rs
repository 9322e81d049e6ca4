//! LLM 走法提供者
//!
//! 通过 OpenAI 兼容的 Chat Completions 接口让 LLM 以 SAN 给出走法。
//! 回复在交给调用方之前会用 `chess-core` 完整校验，局面本身不会被修改。

mod client;
mod engine;
mod parser;
mod prompt;

pub use client::{ChatClient, ChatConfig, ChatMessage};
pub use engine::{LlmEngine, Suggestion};
pub use parser::{LlmReply, ReplyParser};
pub use prompt::{MoveRequest, PromptTemplate};
