//! LLM 走法引擎
//!
//! 请求走法、解析回复、在当前局面上校验，失败时带着拒绝原因重试。

use anyhow::{bail, Result};
use chess_core::{Move, Position};

#[cfg(feature = "llm")]
use tracing::{debug, info, warn};

use crate::client::{ChatClient, ChatConfig};
#[cfg(feature = "llm")]
use crate::parser::ReplyParser;
#[cfg(feature = "llm")]
use crate::prompt::{MoveRequest, PromptTemplate};

/// LLM 给出的已校验走法
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub mv: Move,
    /// 回复中的走法文本
    pub san: String,
    pub comment: Option<String>,
}

/// LLM 走法引擎
pub struct LlmEngine {
    client: ChatClient,
    /// 最大尝试次数
    max_retries: u32,
    /// 是否在提示中列出合法走法
    offer_legal_moves: bool,
}

impl LlmEngine {
    /// 创建新的引擎
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = ChatClient::new(config)?;
        Ok(Self {
            client,
            max_retries: 3,
            offer_legal_moves: true,
        })
    }

    /// 使用环境变量配置创建
    pub fn from_env() -> Result<Self> {
        Self::new(ChatConfig::from_env())
    }

    /// 设置最大尝试次数（至少一次）
    pub fn set_max_retries(&mut self, retries: u32) {
        self.max_retries = retries.max(1);
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn offer_legal_moves(&self) -> bool {
        self.offer_legal_moves
    }

    pub fn set_offer_legal_moves(&mut self, offer: bool) {
        self.offer_legal_moves = offer;
    }

    /// 获取客户端配置
    pub fn config(&self) -> &ChatConfig {
        self.client.config()
    }

    /// 为当前走子方请求一步合法走法
    #[cfg(feature = "llm")]
    pub async fn suggest_move(&self, position: &Position) -> Result<Suggestion> {
        let request = MoveRequest::from_position(position, self.offer_legal_moves);
        let mut messages = PromptTemplate::messages(&request);

        debug!("LLM prompt length: {} chars", messages[0].content.len());

        for attempt in 1..=self.max_retries {
            info!("LLM move attempt {}/{}", attempt, self.max_retries);

            let response = match self.client.complete(&messages).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("LLM request failed (attempt {}): {:#}", attempt, e);
                    continue;
                }
            };

            match ReplyParser::parse_and_validate(&response, position) {
                Ok((reply, mv)) => {
                    info!("LLM suggested {} ({})", reply.san, mv);
                    return Ok(Suggestion {
                        mv,
                        san: reply.san,
                        comment: reply.comment,
                    });
                }
                Err(e) => {
                    warn!("Rejected LLM reply (attempt {}): {:#}", attempt, e);
                    let preview: String = response.chars().take(200).collect();
                    debug!("Reply preview: {}", preview);
                    messages.extend(PromptTemplate::rejection(&response, &format!("{:#}", e)));
                }
            }
        }

        bail!(
            "LLM failed to produce a legal move after {} attempts",
            self.max_retries
        )
    }

    #[cfg(not(feature = "llm"))]
    pub async fn suggest_move(&self, _position: &Position) -> Result<Suggestion> {
        bail!("LLM feature not enabled. Compile with --features llm")
    }
}
