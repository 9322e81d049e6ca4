//! 棋盘与局面状态

use serde::{Deserialize, Serialize};

use crate::castling::CastlingRights;
use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::Result;
use crate::fen::Fen;
use crate::moves::MoveGenerator;
use crate::piece::{Color, Piece, PieceKind, Square};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// 8x8 棋盘，索引为 row * 8 + file，第 0 行是第 8 横线
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; BOARD_WIDTH * BOARD_HEIGHT],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();

        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            board.set(Square::new_unchecked(file, 0), Some(Piece::new(*kind, Color::Black)));
            board.set(Square::new_unchecked(file, 1), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            board.set(Square::new_unchecked(file, 6), Some(Piece::new(PieceKind::Pawn, Color::White)));
            board.set(Square::new_unchecked(file, 7), Some(Piece::new(*kind, Color::White)));
        }

        board
    }

    /// 获取指定格子的棋子
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares.get(sq.to_index()).copied().flatten()
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if let Some(cell) = self.squares.get_mut(sq.to_index()) {
            *cell = piece;
        }
    }

    /// 移动棋子（不检查规则），返回被覆盖的棋子
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 查找指定一方的王
    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.get(sq) == Some(Piece::new(PieceKind::King, color)))
    }

    /// 获取指定一方的所有棋子
    pub fn pieces(&self, color: Color) -> Vec<(Square, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// 获取所有棋子（FEN 顺序）
    pub fn all_pieces(&self) -> Vec<(Square, Piece)> {
        Square::all()
            .filter_map(|sq| self.get(sq).map(|piece| (sq, piece)))
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

/// 完整的局面状态（走子方、易位权、过路兵、步数与历史）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub side_to_move: Color,
    /// 易位权
    pub castling: CastlingRights,
    /// 吃过路兵目标格，只在双步推兵后的一个半回合内存在
    pub en_passant: Option<Square>,
    /// 自上次兵走或吃子以来的半回合数
    pub halfmove_clock: u32,
    /// 完整回合数，黑方走完后 +1
    pub fullmove_number: u32,
    /// 局面快照（不含步数），包含初始局面，用于重复判定
    pub(crate) position_history: Vec<String>,
    /// 已走的 SAN 记录
    pub(crate) move_history: Vec<String>,
    /// 构造时的 FEN
    pub(crate) initial_fen: String,
    pub(crate) first_mover: Color,
    pub(crate) first_fullmove: u32,
}

impl Position {
    /// 创建标准初始局面
    pub fn initial() -> Self {
        Self::from_parts(
            Board::initial(),
            Color::White,
            CastlingRights::all(),
            None,
            0,
            1,
        )
    }

    /// 从 FEN 创建局面
    pub fn from_fen(fen: &str) -> Result<Self> {
        Fen::parse(fen)
    }

    /// 由各字段组装局面，并把当前局面记为历史的第一项
    pub fn from_parts(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let mut position = Self {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            position_history: Vec::new(),
            move_history: Vec::new(),
            initial_fen: String::new(),
            first_mover: side_to_move,
            first_fullmove: fullmove_number,
        };
        position.initial_fen = Fen::to_string(&position, true);
        position.position_history.push(position.snapshot());
        position
    }

    /// 完整 FEN
    pub fn fen(&self) -> String {
        Fen::to_string(self, true)
    }

    /// 不含步数的局面快照
    pub fn snapshot(&self) -> String {
        Fen::to_string(self, false)
    }

    /// 构造时的 FEN
    pub fn initial_fen(&self) -> &str {
        &self.initial_fen
    }

    pub fn position_history(&self) -> &[String] {
        &self.position_history
    }

    pub fn move_history(&self) -> &[String] {
        &self.move_history
    }

    /// 走子方是否被将军
    pub fn is_check(&self) -> bool {
        MoveGenerator::is_in_check(&self.board, self.side_to_move)
    }

    /// 棋谱文本：白方 `N.走法`，黑方 `N...走法`，空格分隔
    pub fn transcript(&self) -> String {
        let mut number = self.first_fullmove;
        let mut side = self.first_mover;
        let mut parts = Vec::with_capacity(self.move_history.len());

        for san in &self.move_history {
            match side {
                Color::White => parts.push(format!("{}.{}", number, san)),
                Color::Black => {
                    parts.push(format!("{}...{}", number, san));
                    number += 1;
                }
            }
            side = side.opponent();
        }

        parts.join(" ")
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::INITIAL_FEN;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    #[test]
    fn test_initial_board() {
        let board = Board::initial();

        assert_eq!(board.get(sq("e1")), Some(Piece::new(PieceKind::King, Color::White)));
        assert_eq!(board.get(sq("e8")), Some(Piece::new(PieceKind::King, Color::Black)));
        assert_eq!(board.get(sq("d1")), Some(Piece::new(PieceKind::Queen, Color::White)));
        assert_eq!(board.get(sq("g8")), Some(Piece::new(PieceKind::Knight, Color::Black)));
        assert_eq!(board.get(sq("a2")), Some(Piece::new(PieceKind::Pawn, Color::White)));
        assert_eq!(board.get(sq("h7")), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert!(board.get(sq("e4")).is_none());
        assert_eq!(board.all_pieces().len(), 32);
    }

    #[test]
    fn test_move_piece() {
        let mut board = Board::initial();

        let captured = board.move_piece(sq("g1"), sq("f3"));
        assert!(captured.is_none());
        assert!(board.get(sq("g1")).is_none());
        assert_eq!(board.get(sq("f3")), Some(Piece::new(PieceKind::Knight, Color::White)));

        let captured = board.move_piece(sq("f3"), sq("e5"));
        assert!(captured.is_none());
        let captured = board.move_piece(sq("e5"), sq("f7"));
        assert_eq!(captured, Some(Piece::new(PieceKind::Pawn, Color::Black)));
    }

    #[test]
    fn test_find_king() {
        let board = Board::initial();
        assert_eq!(board.find_king(Color::White), Some(sq("e1")));
        assert_eq!(board.find_king(Color::Black), Some(sq("e8")));
        assert_eq!(Board::empty().find_king(Color::White), None);
    }

    #[test]
    fn test_initial_position_matches_fen() {
        let position = Position::initial();
        assert_eq!(position.fen(), INITIAL_FEN);
        assert_eq!(position.position_history().len(), 1);
        assert_eq!(position.position_history()[0], position.snapshot());
        assert!(position.move_history().is_empty());
        assert_eq!(position.initial_fen(), INITIAL_FEN);
    }

    #[test]
    fn test_position_instances_do_not_share_history() {
        let mut first = Position::initial();
        let second = Position::initial();

        first.play("e4").unwrap();
        assert_eq!(first.move_history().len(), 1);
        assert!(second.move_history().is_empty());
        assert_eq!(second.position_history().len(), 1);
    }

    #[test]
    fn test_transcript_numbering() {
        let mut position = Position::initial();
        for san in ["e4", "e5", "Nf3"] {
            position.play(san).unwrap();
        }
        assert_eq!(position.transcript(), "1.e4 1...e5 2.Nf3");
    }

    #[test]
    fn test_transcript_starting_with_black() {
        let mut position =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        position.play("e5").unwrap();
        position.play("Nf3").unwrap();
        assert_eq!(position.transcript(), "1...e5 2.Nf3");
    }
}
