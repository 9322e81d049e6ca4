//! 对局会话：人类玩家与 LLM 轮流走子

use chess_core::{
    Adjudicator, ChessError, Color, GameRecord, GameResult, MoveGenerator, Position, WinReason,
};
use chess_llm::Suggestion;
use tracing::{debug, info};

use crate::input::{help_text, Command};

/// 一局对弈
pub struct Game {
    position: Position,
    human: Color,
    /// 人类认输后的结果
    resigned: Option<GameResult>,
}

impl Game {
    /// 从标准初始局面开始
    pub fn new(human: Color) -> Self {
        Self::from_position(Position::initial(), human)
    }

    pub fn from_position(position: Position, human: Color) -> Self {
        info!("New game: human plays {}", human.name());
        Self {
            position,
            human,
            resigned: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn human(&self) -> Color {
        self.human
    }

    pub fn is_human_turn(&self) -> bool {
        self.position.side_to_move == self.human
    }

    /// 执行一步 SAN 走法；失败时局面不变
    pub fn play(&mut self, text: &str) -> Result<String, ChessError> {
        match self.position.play(text) {
            Ok(san) => {
                debug!("Played {}", san);
                Ok(san)
            }
            Err(e) => {
                debug!("Rejected {:?}: {}", text, e);
                Err(e)
            }
        }
    }

    /// 执行 LLM 给出的走法
    pub fn apply_suggestion(&mut self, suggestion: &Suggestion) -> Result<String, ChessError> {
        self.position.apply(&suggestion.mv)
    }

    /// 人类认输
    pub fn resign(&mut self) -> GameResult {
        let result = GameResult::win_for(self.human.opponent(), WinReason::Resign);
        info!("{} resigns", self.human.name());
        self.resigned = Some(result);
        result
    }

    pub fn outcome(&self) -> Option<GameResult> {
        self.resigned.or_else(|| Adjudicator::outcome(&self.position))
    }

    /// 命令的文字输出；`Resign` 和 `Quit` 由调用方处理
    pub fn command_output(&self, command: Command) -> String {
        match command {
            Command::Help => help_text().to_string(),
            Command::Fen => self.position.fen(),
            Command::History => {
                let transcript = self.position.transcript();
                if transcript.is_empty() {
                    "(no moves yet)".to_string()
                } else {
                    transcript
                }
            }
            Command::Moves => {
                let moves: Vec<String> = MoveGenerator::generate_legal(&self.position)
                    .iter()
                    .filter_map(|mv| self.position.clone().apply(mv).ok())
                    .collect();
                moves.join(" ")
            }
            Command::Resign | Command::Quit => String::new(),
        }
    }

    /// 生成棋谱记录
    pub fn record(&self, llm_name: &str) -> Result<GameRecord, ChessError> {
        let (white, black) = match self.human {
            Color::White => ("Human", llm_name),
            Color::Black => (llm_name, "Human"),
        };
        let mut record = GameRecord::from_position(&self.position, white, black)?;
        if let Some(result) = self.outcome() {
            record.set_result(result);
        }
        Ok(record)
    }
}
