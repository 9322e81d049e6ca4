//! Chat Completions 客户端
//!
//! 与 OpenAI 兼容的 `/chat/completions` 接口通信，发送对话并获取回复。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[cfg(feature = "llm")]
use anyhow::bail;
#[cfg(feature = "llm")]
use tracing::{debug, info};

/// 客户端配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// 服务地址，默认 https://api.openai.com/v1
    pub base_url: String,
    /// 模型名称
    pub model: String,
    /// API 密钥，为空时不发送认证头
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// 生成温度，0.0-1.0
    pub temperature: f32,
    /// 最大生成 token 数
    pub max_tokens: u32,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.3,
            max_tokens: 256,
            timeout_secs: 60,
        }
    }
}

impl ChatConfig {
    /// 默认配置叠加环境变量
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 用 `OPENAI_API_KEY`、`OPENAI_BASE_URL`、`OPENAI_MODEL` 覆盖对应字段
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.model = model;
        }
        self
    }

    /// 设置温度（限制在 0.0-1.0）
    pub fn set_temperature(&mut self, temperature: f32) {
        self.temperature = temperature.clamp(0.0, 1.0);
    }

    /// 完整的请求地址
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// 对话消息
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// 请求体
#[cfg_attr(not(feature = "llm"), allow(dead_code))]
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// 响应体
#[cfg_attr(not(feature = "llm"), allow(dead_code))]
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u32,
}

/// 从响应体中取出第一个候选回复
#[cfg_attr(not(feature = "llm"), allow(dead_code))]
fn extract_content(body: &str) -> Result<(String, Option<u32>)> {
    let response: CompletionResponse =
        serde_json::from_str(body).context("Failed to parse chat completion response")?;
    let tokens = response.usage.map(|usage| usage.total_tokens);
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .context("Chat completion response has no content")?;
    Ok((content, tokens))
}

/// Chat Completions 客户端
#[cfg(feature = "llm")]
pub struct ChatClient {
    config: ChatConfig,
    client: reqwest::Client,
}

#[cfg(feature = "llm")]
impl ChatClient {
    /// 创建新的客户端
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    /// 发送对话，返回第一个候选回复
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = self.config.completions_url();
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        };

        debug!(
            "Sending chat completion: model={}, messages={}",
            self.config.model,
            messages.len()
        );

        let mut builder = self.client.post(&url).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to reach chat endpoint ({})", url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            let preview: String = body.chars().take(300).collect();
            bail!("Chat endpoint returned {}: {}", status, preview);
        }

        let (content, tokens) = extract_content(&body)?;
        info!("Chat completion: tokens={:?}, chars={}", tokens, content.len());
        Ok(content)
    }

    /// 获取当前配置
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

/// 非 LLM feature 时的占位实现
#[cfg(not(feature = "llm"))]
pub struct ChatClient {
    config: ChatConfig,
}

#[cfg(not(feature = "llm"))]
impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        anyhow::bail!("LLM feature not enabled. Compile with --features llm")
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}
