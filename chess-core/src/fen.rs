//! FEN 格式解析和生成
//!
//! 国际象棋 FEN 格式：
//! `<棋盘> <走子方> <易位权> <过路兵格> <半回合数> <回合数>`
//!
//! 示例：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1`

use tracing::debug;

use crate::board::{Board, Position};
use crate::castling::CastlingRights;
use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH, KINGSIDE_ROOK_FILE, KING_HOME_FILE, QUEENSIDE_ROOK_FILE};
use crate::error::{ChessError, Result};
use crate::piece::{Color, Piece, PieceKind, Square};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// 棋盘字段中的单个字符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenToken {
    /// 连续空格
    Empty(u8),
    /// 棋子
    Piece(Piece),
}

impl FenToken {
    fn classify(c: char) -> Option<FenToken> {
        match c {
            '1'..='8' => c.to_digit(10).map(|n| FenToken::Empty(n as u8)),
            _ => Piece::from_fen_char(c).map(FenToken::Piece),
        }
    }
}

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为局面
    pub fn parse(fen: &str) -> Result<Position> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(ChessError::malformed_fen(format!(
                "Expected 6 fields, got {}",
                parts.len()
            )));
        }

        let board = Self::parse_board(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::malformed_fen(format!("Invalid side to move: {}", other)));
            }
        };

        let castling = CastlingRights::from_fen(parts[2]).ok_or_else(|| {
            ChessError::malformed_fen(format!("Invalid castling field: {}", parts[2]))
        })?;

        let en_passant = match parts[3] {
            "-" => None,
            s => Some(Square::parse(s).ok_or_else(|| {
                ChessError::malformed_fen(format!("Invalid en passant square: {}", s))
            })?),
        };

        let halfmove_clock = Self::parse_counter(parts[4]).ok_or_else(|| {
            ChessError::malformed_fen(format!("Invalid halfmove clock: {}", parts[4]))
        })?;

        let fullmove_number = Self::parse_counter(parts[5]).ok_or_else(|| {
            ChessError::malformed_fen(format!("Invalid fullmove number: {}", parts[5]))
        })?;

        let castling = Self::sanitize_castling(&board, castling);

        Ok(Position::from_parts(
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        ))
    }

    /// 只接受纯数字（不允许 `+` 号）
    fn parse_counter(s: &str) -> Option<u32> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_HEIGHT {
            return Err(ChessError::malformed_fen(format!(
                "Expected 8 ranks, got {}",
                rows.len()
            )));
        }

        // FEN 从上到下依次是第 8 到第 1 横线
        for (row_idx, row) in rows.iter().enumerate() {
            let mut file = 0usize;

            for c in row.chars() {
                let token = FenToken::classify(c).ok_or_else(|| {
                    ChessError::malformed_fen(format!("Invalid piece character: {}", c))
                })?;

                match token {
                    FenToken::Empty(n) => file += n as usize,
                    FenToken::Piece(piece) => {
                        if file < BOARD_WIDTH {
                            board.set(Square::new_unchecked(file as u8, row_idx as u8), Some(piece));
                        }
                        file += 1;
                    }
                }

                if file > BOARD_WIDTH {
                    return Err(ChessError::malformed_fen(format!(
                        "Rank {} has too many squares",
                        BOARD_HEIGHT - row_idx
                    )));
                }
            }

            if file != BOARD_WIDTH {
                return Err(ChessError::malformed_fen(format!(
                    "Rank {} has {} squares, expected 8",
                    BOARD_HEIGHT - row_idx,
                    file
                )));
            }
        }

        Ok(board)
    }

    /// 清除王或车不在初始格的易位标志
    fn sanitize_castling(board: &Board, mut castling: CastlingRights) -> CastlingRights {
        let before = castling;

        for color in [Color::White, Color::Black] {
            let row = color.back_row();
            let has = |file: u8, kind: PieceKind| {
                board.get(Square::new_unchecked(file, row)) == Some(Piece::new(kind, color))
            };

            if !has(KING_HOME_FILE, PieceKind::King) {
                castling.uncastle(color);
                continue;
            }
            if !has(KINGSIDE_ROOK_FILE, PieceKind::Rook) {
                castling.uncastle_kingside(color);
            }
            if !has(QUEENSIDE_ROOK_FILE, PieceKind::Rook) {
                castling.uncastle_queenside(color);
            }
        }

        if castling != before {
            debug!("Dropped castling rights {} -> {}", before, castling);
        }
        castling
    }

    /// 将局面转换为 FEN 字符串；`include_clocks` 为 false 时省略最后两个步数字段
    pub fn to_string(position: &Position, include_clocks: bool) -> String {
        let mut fen = format!(
            "{} {} {} {}",
            Self::board_to_string(&position.board),
            position.side_to_move.to_fen_char(),
            position.castling,
            position
                .en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_string()),
        );

        if include_clocks {
            fen.push_str(&format!(
                " {} {}",
                position.halfmove_clock, position.fullmove_number
            ));
        }

        fen
    }

    /// 将棋盘转换为 FEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_HEIGHT);

        for row_idx in 0..BOARD_HEIGHT as u8 {
            let mut row = String::new();
            let mut empty_count = 0;

            for file in 0..BOARD_WIDTH as u8 {
                if let Some(piece) = board.get(Square::new_unchecked(file, row_idx)) {
                    if empty_count > 0 {
                        row.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row.push_str(&empty_count.to_string());
            }

            rows.push(row);
        }

        rows.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_initial_fen() {
        let position = Fen::parse(INITIAL_FEN).unwrap();

        assert_eq!(position.side_to_move, Color::White);
        assert_eq!(position.castling, CastlingRights::all());
        assert_eq!(position.en_passant, None);
        assert_eq!(position.halfmove_clock, 0);
        assert_eq!(position.fullmove_number, 1);
        assert_eq!(position.board, Board::initial());
    }

    #[test]
    fn test_fen_roundtrip() {
        let fens = [
            INITIAL_FEN,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40",
            "4k3/8/8/8/8/8/8/4K2R w K - 99 120",
        ];

        for fen in fens {
            let position = Fen::parse(fen).unwrap();
            assert_eq!(Fen::to_string(&position, true), fen);
        }
    }

    #[test]
    fn test_snapshot_omits_clocks() {
        let position = Fen::parse("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40").unwrap();
        assert_eq!(
            Fen::to_string(&position, false),
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -"
        );
    }

    #[test]
    fn test_non_canonical_digit_runs() {
        let position = Fen::parse("4k3/8/8/8/8/8/8/211K3 w - - 0 1").unwrap();
        assert_eq!(Fen::to_string(&position, true), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn test_parse_custom_fen() {
        let fen = "4k3/8/8/8/8/8/8/4K3 b - - 10 5";
        let position = Fen::parse(fen).unwrap();

        assert_eq!(position.side_to_move, Color::Black);
        assert_eq!(position.halfmove_clock, 10);
        assert_eq!(position.fullmove_number, 5);
        assert_eq!(position.board.find_king(Color::White), Square::parse("e1"));
        assert_eq!(position.board.find_king(Color::Black), Square::parse("e8"));
    }

    #[test]
    fn test_castling_rights_sanitized() {
        // 白方王翼车不在 h1
        let position = Fen::parse("r3k2r/8/8/8/8/8/8/R3K3 w KQkq - 0 1").unwrap();
        assert!(!position.castling.kingside(Color::White));
        assert!(position.castling.queenside(Color::White));
        assert!(position.castling.kingside(Color::Black));
        assert!(position.castling.queenside(Color::Black));
    }

    #[test]
    fn test_invalid_fen() {
        let malformed = |fen: &str| matches!(Fen::parse(fen), Err(ChessError::MalformedFen { .. }));

        // 横线数不对
        assert!(malformed("8/8/8 w - - 0 1"));
        // 格子数不对
        assert!(malformed("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(malformed("rnbqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert!(malformed("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        // 无效字符
        assert!(malformed("rnbqkbnx/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        // 字段缺失
        assert!(malformed("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"));
        assert!(malformed(""));
        // 走子方
        assert!(malformed("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"));
        // 易位权
        assert!(malformed("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1"));
        // 过路兵格
        assert!(malformed("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1"));
        // 步数
        assert!(malformed("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - -1 1"));
        assert!(malformed("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 x"));
    }

    #[test]
    fn test_counters_and_ranks_are_strict() {
        let malformed = |fen: &str| matches!(Fen::parse(fen), Err(ChessError::MalformedFen { .. }));

        assert!(malformed("4k3/8/8/8/8/8/8/4K3 w - - +3 1"));
        assert!(malformed("4k3/8/8/8/8/8/8/4K3 w - - 3 +1"));
        assert!(malformed("4k3/8/8/8/8/8/8/04K3 w - - 0 1"));
        assert!(malformed("4k3/8/8/8/8/8/8/4K03 w - - 0 1"));

        let fen = "4k3/8/8/8/8/8/8/4K3 w - - 4294967295 1";
        assert_eq!(Fen::to_string(&Fen::parse(fen).unwrap(), true), fen);
    }
}
