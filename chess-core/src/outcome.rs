//! 终局判定

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::constants::{FIFTY_MOVE_HALFMOVES, REPETITION_COUNT};
use crate::moves::MoveGenerator;
use crate::piece::{Color, PieceKind};

/// 游戏结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// 白方胜
    WhiteWin(WinReason),
    /// 黑方胜
    BlackWin(WinReason),
    /// 和棋
    Draw(DrawReason),
}

impl GameResult {
    /// 指定一方获胜
    pub fn win_for(color: Color, reason: WinReason) -> Self {
        match color {
            Color::White => GameResult::WhiteWin(reason),
            Color::Black => GameResult::BlackWin(reason),
        }
    }

    /// PGN 风格的比分
    pub fn score(&self) -> &'static str {
        match self {
            GameResult::WhiteWin(_) => "1-0",
            GameResult::BlackWin(_) => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameResult::WhiteWin(reason) => write!(f, "White wins by {}", reason),
            GameResult::BlackWin(reason) => write!(f, "Black wins by {}", reason),
            GameResult::Draw(reason) => write!(f, "Draw by {}", reason),
        }
    }
}

/// 胜利原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// 将死
    Checkmate,
    /// 对方认输
    Resign,
}

impl std::fmt::Display for WinReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinReason::Checkmate => write!(f, "checkmate"),
            WinReason::Resign => write!(f, "resignation"),
        }
    }
}

/// 和棋原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    /// 无子可动
    Stalemate,
    /// 同一局面出现三次
    ThreefoldRepetition,
    /// 五十回合无吃子、无兵走动
    FiftyMoves,
    /// 双方都无法将死对方
    InsufficientMaterial,
}

impl std::fmt::Display for DrawReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawReason::Stalemate => write!(f, "stalemate"),
            DrawReason::ThreefoldRepetition => write!(f, "threefold repetition"),
            DrawReason::FiftyMoves => write!(f, "fifty-move rule"),
            DrawReason::InsufficientMaterial => write!(f, "insufficient material"),
        }
    }
}

/// 终局裁判
pub struct Adjudicator;

impl Adjudicator {
    /// 检查走子方是否被将死
    pub fn is_checkmate(position: &Position) -> bool {
        if !position.is_check() {
            return false;
        }
        MoveGenerator::generate_legal(position).is_empty()
    }

    /// 检查是否逼和（无合法走法但未被将军）
    pub fn is_stalemate(position: &Position) -> bool {
        if position.is_check() {
            return false;
        }
        MoveGenerator::generate_legal(position).is_empty()
    }

    /// 当前局面快照在历史中出现至少三次
    pub fn is_threefold_repetition(position: &Position) -> bool {
        let current = position.snapshot();
        position
            .position_history()
            .iter()
            .filter(|snapshot| **snapshot == current)
            .count()
            >= REPETITION_COUNT
    }

    pub fn is_fifty_move_rule(position: &Position) -> bool {
        position.halfmove_clock >= FIFTY_MOVE_HALFMOVES
    }

    /// 子力不足以将死
    ///
    /// 有兵、车或后时总是足够；否则以下情况判和：
    /// 光杆王对光杆王、全场只有一个轻子、王双马对光杆王、
    /// 只剩同色格的象。
    pub fn is_insufficient_material(position: &Position) -> bool {
        let pieces = position.board.all_pieces();

        let mut minors = Vec::new();
        for (sq, piece) in &pieces {
            if piece.kind.is_minor() {
                minors.push((*sq, *piece));
            } else if piece.kind != PieceKind::King {
                return false;
            }
        }

        if minors.len() <= 1 {
            return true;
        }

        let all_knights_one_side = minors
            .iter()
            .all(|(_, p)| p.kind == PieceKind::Knight && p.color == minors[0].1.color);
        if minors.len() == 2 && all_knights_one_side {
            return true;
        }

        let all_bishops = minors.iter().all(|(_, p)| p.kind == PieceKind::Bishop);
        let first_shade = minors[0].0.is_light();
        all_bishops && minors.iter().all(|(sq, _)| sq.is_light() == first_shade)
    }

    /// 按将死、逼和、三次重复、五十回合、子力不足的顺序判定
    pub fn outcome(position: &Position) -> Option<GameResult> {
        if Self::is_checkmate(position) {
            return Some(GameResult::win_for(
                position.side_to_move.opponent(),
                WinReason::Checkmate,
            ));
        }
        if Self::is_stalemate(position) {
            return Some(GameResult::Draw(DrawReason::Stalemate));
        }
        if Self::is_threefold_repetition(position) {
            return Some(GameResult::Draw(DrawReason::ThreefoldRepetition));
        }
        if Self::is_fifty_move_rule(position) {
            return Some(GameResult::Draw(DrawReason::FiftyMoves));
        }
        if Self::is_insufficient_material(position) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn test_initial_position_has_no_outcome() {
        assert_eq!(Adjudicator::outcome(&Position::initial()), None);
    }

    #[test]
    fn test_fools_mate() {
        let mut pos = Position::initial();
        for san in ["f3", "e5", "g4", "Qh4"] {
            pos.play(san).unwrap();
        }
        assert!(Adjudicator::is_checkmate(&pos));
        assert_eq!(
            Adjudicator::outcome(&pos),
            Some(GameResult::BlackWin(WinReason::Checkmate))
        );
    }

    #[test]
    fn test_back_rank_mate() {
        let pos = position("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert!(Adjudicator::is_checkmate(&pos));
        assert!(!Adjudicator::is_stalemate(&pos));
        assert_eq!(
            Adjudicator::outcome(&pos),
            Some(GameResult::WhiteWin(WinReason::Checkmate))
        );
    }

    #[test]
    fn test_stalemate() {
        let pos = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(Adjudicator::is_stalemate(&pos));
        assert!(!Adjudicator::is_checkmate(&pos));
        assert_eq!(
            Adjudicator::outcome(&pos),
            Some(GameResult::Draw(DrawReason::Stalemate))
        );
    }

    #[test]
    fn test_threefold_repetition() {
        let mut pos = Position::initial();
        let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];

        for san in shuffle {
            pos.play(san).unwrap();
        }
        // 初始局面出现两次
        assert!(!Adjudicator::is_threefold_repetition(&pos));

        for san in shuffle {
            pos.play(san).unwrap();
        }
        assert!(Adjudicator::is_threefold_repetition(&pos));
        assert_eq!(
            Adjudicator::outcome(&pos),
            Some(GameResult::Draw(DrawReason::ThreefoldRepetition))
        );
    }

    #[test]
    fn test_fifty_move_rule() {
        let pos = position("4k3/8/8/8/8/8/4P3/4K3 w - - 99 80");
        assert!(!Adjudicator::is_fifty_move_rule(&pos));

        let pos = position("4k3/8/8/8/8/8/4P3/4K3 w - - 100 80");
        assert!(Adjudicator::is_fifty_move_rule(&pos));
        assert_eq!(
            Adjudicator::outcome(&pos),
            Some(GameResult::Draw(DrawReason::FiftyMoves))
        );
    }

    #[test]
    fn test_insufficient_material() {
        let insufficient = |fen: &str| Adjudicator::is_insufficient_material(&position(fen));

        // 光杆王
        assert!(insufficient("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        // 单马、单象
        assert!(insufficient("4k3/8/8/8/8/8/8/4KN2 w - - 0 1"));
        assert!(insufficient("4kb2/8/8/8/8/8/8/4K3 w - - 0 1"));
        // 王双马对光杆王
        assert!(insufficient("4k3/8/8/8/8/8/8/3NKN2 w - - 0 1"));
        // 同色格的象（c1 与 f8 都是深色格）
        assert!(insufficient("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1"));

        // 异色格的象
        assert!(!insufficient("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1"));
        // 马象
        assert!(!insufficient("4k3/8/8/8/8/8/8/2B1KN2 w - - 0 1"));
        // 双方各一马
        assert!(!insufficient("4kn2/8/8/8/8/8/8/4KN2 w - - 0 1"));
        // 有兵、车、后
        assert!(!insufficient("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/4KR2 w - - 0 1"));
        assert!(!insufficient("4k3/8/8/8/8/8/8/3QK3 w - - 0 1"));
        assert!(!insufficient(crate::fen::INITIAL_FEN));

        assert_eq!(
            Adjudicator::outcome(&position("4k3/8/8/8/8/8/8/4K3 w - - 0 1")),
            Some(GameResult::Draw(DrawReason::InsufficientMaterial))
        );
    }

    #[test]
    fn test_checkmate_takes_precedence() {
        // 将死同时满足五十回合
        let pos = position("R5k1/5ppp/8/8/8/8/8/6K1 b - - 120 90");
        assert_eq!(
            Adjudicator::outcome(&pos),
            Some(GameResult::WhiteWin(WinReason::Checkmate))
        );
    }

    #[test]
    fn test_result_display() {
        assert_eq!(
            GameResult::WhiteWin(WinReason::Checkmate).to_string(),
            "White wins by checkmate"
        );
        assert_eq!(GameResult::Draw(DrawReason::Stalemate).score(), "1/2-1/2");
    }
}
