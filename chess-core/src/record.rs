//! 棋谱记录格式
//!
//! 支持 JSON 格式的棋谱存储，便于 LLM 分析与回放

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::error::Result;
use crate::outcome::GameResult;
use crate::piece::Square;

/// 棋谱版本
pub const RECORD_VERSION: &str = "1.0";

/// 游戏元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// 白方玩家名
    pub white: String,
    /// 黑方玩家名
    pub black: String,
    /// 游戏日期
    pub date: String,
    /// 游戏结果
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GameResult>,
}

/// 走法记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 标准 SAN（含将军后缀）
    pub san: String,
    pub from: Square,
    pub to: Square,
    /// 走子后的 FEN
    pub fen: String,
}

/// 完整的棋谱记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// 版本号
    pub version: String,
    /// 元数据
    pub metadata: GameMetadata,
    /// 初始局面 FEN
    pub initial_fen: String,
    /// 走法列表
    pub moves: Vec<MoveRecord>,
}

impl GameRecord {
    /// 创建从标准初始局面开始的空棋谱
    pub fn new(white: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            metadata: GameMetadata {
                white: white.into(),
                black: black.into(),
                date: Utc::now().format("%Y-%m-%d").to_string(),
                result: None,
            },
            initial_fen: crate::fen::INITIAL_FEN.to_string(),
            moves: Vec::new(),
        }
    }

    /// 从局面的历史重建棋谱
    pub fn from_position(
        position: &Position,
        white: impl Into<String>,
        black: impl Into<String>,
    ) -> Result<Self> {
        let mut record = Self::new(white, black);
        record.initial_fen = position.initial_fen().to_string();

        let mut replay = Position::from_fen(&record.initial_fen)?;
        for san in position.move_history() {
            record.push(&mut replay, san)?;
        }
        Ok(record)
    }

    /// 在 `position` 上走一步并记录
    pub fn push(&mut self, position: &mut Position, san: &str) -> Result<()> {
        let mv = crate::notation::Notation::decode(position, san)?;
        let san = position.apply(&mv)?;
        self.moves.push(MoveRecord {
            san,
            from: mv.from,
            to: mv.to,
            fen: position.fen(),
        });
        Ok(())
    }

    /// 设置游戏结果
    pub fn set_result(&mut self, result: GameResult) {
        self.metadata.result = Some(result);
    }

    /// 从初始局面重放所有走法，返回最终局面
    pub fn replay(&self) -> Result<Position> {
        let mut position = Position::from_fen(&self.initial_fen)?;
        for mv in &self.moves {
            position.play(&mv.san)?;
        }
        Ok(position)
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 生成 LLM 友好的文本格式
    pub fn to_llm_format(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("White: {}\n", self.metadata.white));
        output.push_str(&format!("Black: {}\n", self.metadata.black));
        output.push_str(&format!("Initial position: {}\n", self.initial_fen));

        if !self.moves.is_empty() {
            let transcript = self
                .replay()
                .map(|position| position.transcript())
                .unwrap_or_else(|_| {
                    self.moves
                        .iter()
                        .map(|mv| mv.san.as_str())
                        .collect::<Vec<_>>()
                        .join(" ")
                });
            output.push_str(&format!("\nMoves: {}\n", transcript));
        }

        if let Some(ref result) = self.metadata.result {
            output.push_str(&format!("\nResult: {} ({})\n", result, result.score()));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::WinReason;

    fn fools_mate() -> Position {
        let mut position = Position::initial();
        for san in ["f3", "e5", "g4", "Qh4"] {
            position.play(san).unwrap();
        }
        position
    }

    #[test]
    fn test_from_position() {
        let record = GameRecord::from_position(&fools_mate(), "Alice", "gpt-4o-mini").unwrap();

        assert_eq!(record.metadata.white, "Alice");
        assert_eq!(record.moves.len(), 4);
        assert_eq!(record.moves[3].san, "Qh4#");
        assert_eq!(record.moves[3].from, Square::parse("d8").unwrap());
        assert_eq!(record.moves[3].to, Square::parse("h4").unwrap());
        assert_eq!(record.moves[0].fen, "rnbqkbnr/pppppppp/8/8/8/5P2/PPPPP1PP/RNBQKBNR b KQkq - 0 1");
    }

    #[test]
    fn test_game_record_json() {
        let mut record = GameRecord::from_position(&fools_mate(), "Alice", "Bob").unwrap();
        record.set_result(GameResult::BlackWin(WinReason::Checkmate));

        let json = record.to_json().unwrap();
        let parsed = GameRecord::from_json(&json).unwrap();
        assert_eq!(parsed, record);
        assert!(GameRecord::from_json("{not json").is_err());
    }

    #[test]
    fn test_replay() {
        let played = fools_mate();
        let record = GameRecord::from_position(&played, "Alice", "Bob").unwrap();
        let replayed = record.replay().unwrap();

        assert_eq!(replayed.fen(), played.fen());
        assert_eq!(replayed.move_history(), played.move_history());
    }

    #[test]
    fn test_replay_from_custom_fen() {
        let mut position = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 30").unwrap();
        position.play("Kd7").unwrap();
        position.play("e4").unwrap();

        let record = GameRecord::from_position(&position, "a", "b").unwrap();
        assert_eq!(record.initial_fen, "4k3/8/8/8/8/8/4P3/4K3 b - - 0 30");
        assert_eq!(record.replay().unwrap(), position);
    }

    #[test]
    fn test_llm_format() {
        let mut record = GameRecord::from_position(&fools_mate(), "Alice", "Bob").unwrap();
        record.set_result(GameResult::BlackWin(WinReason::Checkmate));

        let text = record.to_llm_format();
        assert!(text.contains("White: Alice"));
        assert!(text.contains("1.f3 1...e5 2.g4 2...Qh4#"));
        assert!(text.contains("0-1"));
    }
}
