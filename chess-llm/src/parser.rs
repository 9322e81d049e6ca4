//! LLM 回复解析器
//!
//! 回复约定为两行：第一行是 SAN 走法，第二行是简短说明。
//! 解析时容忍推理标签、代码块、回合编号等常见噪声。

use anyhow::{bail, Context, Result};
use chess_core::{Move, MoveGenerator, Notation, Position};
use tracing::debug;

/// 解析后的 LLM 回复
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmReply {
    /// 走法文本（未经合法性校验）
    pub san: String,
    /// 走法说明
    pub comment: Option<String>,
}

/// LLM 回复解析器
pub struct ReplyParser;

impl ReplyParser {
    /// 去除 `<think>...</think>` 块与 markdown 代码块标记
    pub fn clean(response: &str) -> String {
        let mut text = response.to_string();

        while let Some(end) = text.find("</think>") {
            let start = text[..end].find("<think>").unwrap_or(0);
            text.replace_range(start..end + "</think>".len(), "");
        }
        // 未闭合的推理块没有可用内容
        if let Some(start) = text.find("<think>") {
            text.truncate(start);
        }

        text.lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// 解析回复：第一条非空行为走法，其余为说明
    pub fn parse(response: &str) -> Result<LlmReply> {
        let cleaned = Self::clean(response);
        let mut lines = cleaned.lines().map(str::trim).filter(|line| !line.is_empty());

        let first = lines.next().context("LLM reply is empty")?;
        let san = Self::normalize_move(first);
        if san.is_empty() {
            bail!("No move found in LLM reply line {:?}", first);
        }

        let rest: Vec<&str> = lines.collect();
        let comment = (!rest.is_empty()).then(|| rest.join(" "));

        Ok(LlmReply { san, comment })
    }

    /// 提取走法记号：去掉回合编号、强调符号和结尾标点（保留 `+`/`#`）
    fn normalize_move(line: &str) -> String {
        let line = line.trim_matches(|c: char| c == '*' || c == '`' || c == '"' || c.is_whitespace());

        // "12." 或 "12..." 形式的回合编号；"0-0" 不受影响
        let after_digits = line.trim_start_matches(|c: char| c.is_ascii_digit());
        let line = if after_digits.len() < line.len() && after_digits.starts_with('.') {
            after_digits.trim_start_matches('.').trim_start()
        } else {
            line
        };

        let token = line.split_whitespace().next().unwrap_or("");
        token
            .trim_matches(|c: char| c == '*' || c == '`' || c == '"')
            .trim_end_matches(|c: char| !(c.is_ascii_alphanumeric() || c == '+' || c == '#'))
            .to_string()
    }

    /// 解析并在给定局面上校验走法，不修改局面
    pub fn parse_and_validate(response: &str, position: &Position) -> Result<(LlmReply, Move)> {
        let reply = Self::parse(response)?;
        debug!("Parsed LLM reply: {:?}", reply);

        let mv = Notation::decode(position, &reply.san)
            .with_context(|| format!("Could not decode move {:?}", reply.san))?;
        MoveGenerator::validate(position, &mv)
            .with_context(|| format!("Move {:?} is not legal here", reply.san))?;

        Ok((reply, mv))
    }
}
