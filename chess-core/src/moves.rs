//! 走法描述、走法生成和合法性验证

use serde::{Deserialize, Serialize};

use crate::board::{Board, Position};
use crate::constants::{KINGSIDE_ROOK_FILE, KING_HOME_FILE, QUEENSIDE_ROOK_FILE};
use crate::error::{ChessError, Result};
use crate::piece::{Color, Piece, PieceKind, Square};

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// 走法类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Normal,
    Capture,
    DoublePawnPush,
    EnPassant,
    /// 升变（可能同时吃子，见 `Move::captured`）
    Promotion,
    CastleKingside,
    CastleQueenside,
}

/// 走法描述：解码后、尚未执行的走子意图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub kind: MoveKind,
    /// 走动的棋子（易位时为王）
    pub piece: PieceKind,
    /// 起始格（易位时为王的初始格）
    pub from: Square,
    /// 目标格（易位时为王的落点）
    pub to: Square,
    /// 升变棋子，仅在升变时存在
    pub promotion: Option<PieceKind>,
    /// 被吃的棋子（吃过路兵时为对方的兵）
    pub captured: Option<Piece>,
}

impl Move {
    /// 创建不吃子的普通走法
    pub fn new(piece: PieceKind, from: Square, to: Square) -> Self {
        Self {
            kind: MoveKind::Normal,
            piece,
            from,
            to,
            promotion: None,
            captured: None,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::CastleKingside | MoveKind::CastleQueenside)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            MoveKind::CastleKingside => write!(f, "O-O"),
            MoveKind::CastleQueenside => write!(f, "O-O-O"),
            _ => {
                write!(f, "{}{}", self.from, self.to)?;
                if let Some(promotion) = self.promotion {
                    write!(f, "{}", promotion.to_char().to_ascii_lowercase())?;
                }
                Ok(())
            }
        }
    }
}

/// 走法生成器与合法性引擎
///
/// 针对给定局面无状态地回答“某个棋子能否走到某格”。
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成走子方的所有伪合法走法（不考虑自身被将军，易位除外）
    pub fn generate_pseudo_legal(position: &Position) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        let side = position.side_to_move;

        for (sq, piece) in position.board.pieces(side) {
            Self::generate_piece_moves(position, sq, piece, &mut moves);
        }

        for kingside in [true, false] {
            if Self::check_castle(position, kingside).is_ok() {
                moves.push(Self::castle_move(side, kingside));
            }
        }

        moves
    }

    /// 生成走子方的所有合法走法（过滤掉会导致己方被将军的走法）
    pub fn generate_legal(position: &Position) -> Vec<Move> {
        Self::generate_pseudo_legal(position)
            .into_iter()
            .filter(|mv| !Self::leaves_king_in_check(position, mv))
            .collect()
    }

    /// 生成指定棋子的所有伪合法走法
    fn generate_piece_moves(position: &Position, sq: Square, piece: Piece, moves: &mut Vec<Move>) {
        let board = &position.board;
        match piece.kind {
            PieceKind::Pawn => Self::generate_pawn_moves(position, sq, piece.color, moves),
            PieceKind::Knight => Self::generate_step_moves(board, sq, piece, &KNIGHT_OFFSETS, moves),
            PieceKind::King => Self::generate_step_moves(board, sq, piece, &KING_OFFSETS, moves),
            PieceKind::Bishop => Self::generate_slide_moves(board, sq, piece, &BISHOP_DIRECTIONS, moves),
            PieceKind::Rook => Self::generate_slide_moves(board, sq, piece, &ROOK_DIRECTIONS, moves),
            PieceKind::Queen => {
                Self::generate_slide_moves(board, sq, piece, &ROOK_DIRECTIONS, moves);
                Self::generate_slide_moves(board, sq, piece, &BISHOP_DIRECTIONS, moves);
            }
        }
    }

    /// 生成马、王这类单步棋子的走法
    fn generate_step_moves(
        board: &Board,
        from: Square,
        piece: Piece,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(df, dr) in offsets {
            if let Some(to) = from.offset(df, dr) {
                Self::try_add_move(board, from, to, piece, moves);
            }
        }
    }

    /// 生成车、象、后这类直线棋子的走法
    fn generate_slide_moves(
        board: &Board,
        from: Square,
        piece: Piece,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(df, dr) in directions {
            let mut current = from;
            while let Some(to) = current.offset(df, dr) {
                Self::try_add_move(board, from, to, piece, moves);
                if board.get(to).is_some() {
                    break;
                }
                current = to;
            }
        }
    }

    /// 生成兵的走法：单步、双步、斜吃、吃过路兵，到底线时展开所有升变
    fn generate_pawn_moves(position: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
        let dir = color.pawn_direction();
        let mut targets = Vec::with_capacity(4);

        if let Some(one) = from.offset(0, dir) {
            targets.push(one);
            if let Some(two) = from.offset(0, 2 * dir) {
                targets.push(two);
            }
        }
        for df in [-1i8, 1] {
            if let Some(diagonal) = from.offset(df, dir) {
                targets.push(diagonal);
            }
        }

        for to in targets {
            if !Self::pawn_can_reach(&position.board, from, color, to, position.en_passant) {
                continue;
            }
            if to.row == color.promotion_row() {
                for promotion in PieceKind::PROMOTIONS {
                    moves.push(Self::classify(position, PieceKind::Pawn, from, to, Some(promotion)));
                }
            } else {
                moves.push(Self::classify(position, PieceKind::Pawn, from, to, None));
            }
        }
    }

    /// 尝试添加走法（目标格为空或有对方棋子）
    fn try_add_move(board: &Board, from: Square, to: Square, piece: Piece, moves: &mut Vec<Move>) {
        match board.get(to) {
            Some(target) if target.color == piece.color => {}
            Some(target) => moves.push(Move {
                kind: MoveKind::Capture,
                captured: Some(target),
                ..Move::new(piece.kind, from, to)
            }),
            None => moves.push(Move::new(piece.kind, from, to)),
        }
    }

    /// 根据棋盘计算走法的实际类型（吃子标记以棋盘为准）
    pub fn classify(
        position: &Position,
        piece: PieceKind,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Move {
        let board = &position.board;
        let mut mv = Move::new(piece, from, to);
        mv.captured = board.get(to);

        if piece != PieceKind::Pawn {
            if mv.captured.is_some() {
                mv.kind = MoveKind::Capture;
            }
            return mv;
        }

        let color = board.get(from).map_or(position.side_to_move, |p| p.color);

        if from.file == to.file && (to.row as i8 - from.row as i8).abs() == 2 {
            mv.kind = MoveKind::DoublePawnPush;
        } else if from.file != to.file && mv.captured.is_none() && position.en_passant == Some(to) {
            mv.kind = MoveKind::EnPassant;
            mv.captured = board.get(Square::new_unchecked(to.file, from.row));
        } else if to.row == color.promotion_row() {
            mv.kind = MoveKind::Promotion;
            mv.promotion = promotion;
        } else if mv.captured.is_some() {
            mv.kind = MoveKind::Capture;
        }

        mv
    }

    /// 构造易位走法描述
    pub fn castle_move(side: Color, kingside: bool) -> Move {
        let row = side.back_row();
        let (to_file, kind) = if kingside {
            (6, MoveKind::CastleKingside)
        } else {
            (2, MoveKind::CastleQueenside)
        };
        Move {
            kind,
            ..Move::new(
                PieceKind::King,
                Square::new_unchecked(KING_HOME_FILE, row),
                Square::new_unchecked(to_file, row),
            )
        }
    }

    /// 检查易位条件：易位权、王车在位、中间格为空、王不在被攻击的格上经过
    pub fn check_castle(position: &Position, kingside: bool) -> Result<()> {
        let side = position.side_to_move;
        let board = &position.board;
        let row = side.back_row();
        let wing = if kingside { "kingside" } else { "queenside" };

        let has_right = if kingside {
            position.castling.kingside(side)
        } else {
            position.castling.queenside(side)
        };
        if !has_right {
            return Err(ChessError::illegal(format!(
                "{} has no {} castling right",
                side.name(),
                wing
            )));
        }

        let rook_file = if kingside { KINGSIDE_ROOK_FILE } else { QUEENSIDE_ROOK_FILE };
        let king_home = Square::new_unchecked(KING_HOME_FILE, row);
        let rook_home = Square::new_unchecked(rook_file, row);
        if board.get(king_home) != Some(Piece::new(PieceKind::King, side))
            || board.get(rook_home) != Some(Piece::new(PieceKind::Rook, side))
        {
            return Err(ChessError::illegal(format!(
                "king or rook not on its home square for {} castling",
                wing
            )));
        }

        let between: &[u8] = if kingside { &[5, 6] } else { &[1, 2, 3] };
        if between
            .iter()
            .any(|&file| board.get(Square::new_unchecked(file, row)).is_some())
        {
            return Err(ChessError::illegal(format!("{} castling path is blocked", wing)));
        }

        // 王的当前格、经过格、落点都不能被攻击
        let king_path: &[u8] = if kingside { &[4, 5, 6] } else { &[4, 3, 2] };
        if king_path
            .iter()
            .any(|&file| Self::is_square_attacked(board, Square::new_unchecked(file, row), side.opponent()))
        {
            return Err(ChessError::LeavesKingInCheck);
        }

        Ok(())
    }

    /// 棋子按走法几何能否从 from 到达 to（不考虑自身被将军）
    pub fn can_reach(position: &Position, from: Square, piece: Piece, to: Square) -> bool {
        let board = &position.board;
        if from == to {
            return false;
        }
        if let Some(target) = board.get(to) {
            if target.color == piece.color {
                return false;
            }
        }

        match piece.kind {
            PieceKind::Pawn => Self::pawn_can_reach(board, from, piece.color, to, position.en_passant),
            _ => Self::attacks(board, from, piece, to),
        }
    }

    /// 兵的走法：单步、初始行双步、斜吃、吃过路兵
    fn pawn_can_reach(board: &Board, from: Square, color: Color, to: Square, en_passant: Option<Square>) -> bool {
        let dir = color.pawn_direction();
        let df = to.file as i8 - from.file as i8;
        let dr = to.row as i8 - from.row as i8;
        let target = board.get(to);

        if df == 0 {
            if dr == dir {
                return target.is_none();
            }
            if dr == 2 * dir && from.row == color.pawn_home_row() {
                let middle = Square::new_unchecked(from.file, (from.row as i8 + dir) as u8);
                return target.is_none() && board.get(middle).is_none();
            }
            return false;
        }

        if df.abs() != 1 || dr != dir {
            return false;
        }

        match target {
            Some(piece) => piece.color != color,
            None => {
                // 吃过路兵：目标格是记录的过路兵格，且对方的兵就在目标格后方
                en_passant == Some(to)
                    && board.get(Square::new_unchecked(to.file, from.row))
                        == Some(Piece::new(PieceKind::Pawn, color.opponent()))
            }
        }
    }

    /// 检查棋子是否攻击目标格（兵只算斜向）
    fn attacks(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
        let df = target.file as i8 - from.file as i8;
        let dr = target.row as i8 - from.row as i8;
        if df == 0 && dr == 0 {
            return false;
        }

        match piece.kind {
            PieceKind::Pawn => df.abs() == 1 && dr == piece.color.pawn_direction(),
            PieceKind::Knight => {
                (df.abs() == 1 && dr.abs() == 2) || (df.abs() == 2 && dr.abs() == 1)
            }
            PieceKind::King => df.abs() <= 1 && dr.abs() <= 1,
            PieceKind::Rook => (df == 0 || dr == 0) && Self::path_clear(board, from, target),
            PieceKind::Bishop => df.abs() == dr.abs() && Self::path_clear(board, from, target),
            PieceKind::Queen => {
                (df == 0 || dr == 0 || df.abs() == dr.abs()) && Self::path_clear(board, from, target)
            }
        }
    }

    /// 直线或斜线上 from 与 to 之间的格子是否全部为空
    fn path_clear(board: &Board, from: Square, to: Square) -> bool {
        let step_f = (to.file as i8 - from.file as i8).signum();
        let step_r = (to.row as i8 - from.row as i8).signum();

        let mut current = from;
        while let Some(next) = current.offset(step_f, step_r) {
            if next == to {
                return true;
            }
            if board.get(next).is_some() {
                return false;
            }
            current = next;
        }
        false
    }

    /// 指定格是否被某一方攻击
    pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
        board
            .pieces(by)
            .into_iter()
            .any(|(from, piece)| Self::attacks(board, from, piece, sq))
    }

    /// 检查指定一方是否被将军
    pub fn is_in_check(board: &Board, side: Color) -> bool {
        match board.find_king(side) {
            Some(king) => Self::is_square_attacked(board, king, side.opponent()),
            None => false,
        }
    }

    /// 在棋盘上执行走法（不检查规则，不更新局面其他字段）
    pub(crate) fn play_on_board(board: &mut Board, mv: &Move, color: Color) {
        match mv.kind {
            MoveKind::CastleKingside | MoveKind::CastleQueenside => {
                let row = mv.from.row;
                let (rook_from, rook_to) = if mv.kind == MoveKind::CastleKingside {
                    (KINGSIDE_ROOK_FILE, 5)
                } else {
                    (QUEENSIDE_ROOK_FILE, 3)
                };
                board.move_piece(mv.from, mv.to);
                board.move_piece(
                    Square::new_unchecked(rook_from, row),
                    Square::new_unchecked(rook_to, row),
                );
            }
            MoveKind::EnPassant => {
                board.move_piece(mv.from, mv.to);
                board.set(Square::new_unchecked(mv.to.file, mv.from.row), None);
            }
            MoveKind::Promotion => {
                let kind = mv.promotion.unwrap_or(PieceKind::Queen);
                board.set(mv.from, None);
                board.set(mv.to, Some(Piece::new(kind, color)));
            }
            MoveKind::Normal | MoveKind::Capture | MoveKind::DoublePawnPush => {
                board.move_piece(mv.from, mv.to);
            }
        }
    }

    /// 模拟走法后己方王是否被将军
    pub fn leaves_king_in_check(position: &Position, mv: &Move) -> bool {
        let side = position.side_to_move;
        let mut test_board = position.board.clone();
        Self::play_on_board(&mut test_board, mv, side);
        Self::is_in_check(&test_board, side)
    }

    /// 完整验证走法描述：棋子、几何、类型、升变、易位条件和自将过滤
    pub fn validate(position: &Position, mv: &Move) -> Result<()> {
        let side = position.side_to_move;

        let piece = position
            .board
            .get(mv.from)
            .ok_or_else(|| ChessError::illegal(format!("no piece on {}", mv.from)))?;
        if piece.color != side {
            return Err(ChessError::illegal(format!(
                "piece on {} does not belong to {}",
                mv.from,
                side.name()
            )));
        }
        if piece.kind != mv.piece {
            return Err(ChessError::illegal(format!(
                "expected {:?} on {}, found {:?}",
                mv.piece, mv.from, piece.kind
            )));
        }

        if mv.is_castle() {
            let expected = Self::castle_move(side, mv.kind == MoveKind::CastleKingside);
            if expected != *mv {
                return Err(ChessError::illegal(format!("malformed castling move {}", mv)));
            }
            return Self::check_castle(position, mv.kind == MoveKind::CastleKingside);
        }

        if !Self::can_reach(position, mv.from, piece, mv.to) {
            return Err(ChessError::illegal(format!(
                "{:?} on {} cannot reach {}",
                piece.kind, mv.from, mv.to
            )));
        }

        let reaches_last_row = piece.kind == PieceKind::Pawn && mv.to.row == side.promotion_row();
        match mv.promotion {
            None if reaches_last_row => {
                return Err(ChessError::MissingPromotion {
                    san: mv.to_string(),
                })
            }
            Some(_) if !reaches_last_row => {
                return Err(ChessError::UnexpectedPromotion {
                    san: mv.to_string(),
                })
            }
            Some(PieceKind::Pawn) | Some(PieceKind::King) => {
                return Err(ChessError::illegal(format!("cannot promote to {:?}", mv.promotion)));
            }
            _ => {}
        }

        let expected = Self::classify(position, piece.kind, mv.from, mv.to, mv.promotion);
        if expected != *mv {
            return Err(ChessError::illegal(format!(
                "move {} is a {:?}, not a {:?}",
                mv, expected.kind, mv.kind
            )));
        }

        if Self::leaves_king_in_check(position, mv) {
            return Err(ChessError::LeavesKingInCheck);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    fn perft(position: &Position, depth: u32) -> usize {
        if depth == 0 {
            return 1;
        }
        MoveGenerator::generate_legal(position)
            .iter()
            .map(|mv| {
                let mut next = position.clone();
                next.apply(mv).unwrap();
                perft(&next, depth - 1)
            })
            .sum()
    }

    #[test]
    fn test_initial_moves() {
        let position = Position::initial();
        let moves = MoveGenerator::generate_legal(&position);
        assert_eq!(moves.len(), 20);

        let knight = moves
            .iter()
            .find(|m| m.from == sq("g1") && m.to == sq("f3"));
        assert!(knight.is_some());

        let double_push = moves
            .iter()
            .find(|m| m.from == sq("e2") && m.to == sq("e4"))
            .unwrap();
        assert_eq!(double_push.kind, MoveKind::DoublePawnPush);
    }

    #[test]
    fn test_perft_initial() {
        assert_eq!(perft(&Position::initial(), 2), 400);
    }

    #[test]
    fn test_perft_kiwipete() {
        let position = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(perft(&position, 1), 48);
        assert_eq!(perft(&position, 2), 2039);
    }

    #[test]
    fn test_perft_known_positions() {
        let cases = [
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 14),
            ("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", 6),
            ("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", 44),
        ];
        for (fen, expected) in cases {
            let position = Position::from_fen(fen).unwrap();
            assert_eq!(perft(&position, 1), expected, "{}", fen);
        }
    }

    #[test]
    fn test_knight_geometry() {
        let position = Position::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").unwrap();
        let knight = Piece::new(PieceKind::Knight, Color::White);

        let mut moves = Vec::new();
        MoveGenerator::generate_piece_moves(&position, sq("d4"), knight, &mut moves);
        assert_eq!(moves.len(), 8);

        assert!(MoveGenerator::can_reach(&position, sq("d4"), knight, sq("e6")));
        assert!(!MoveGenerator::can_reach(&position, sq("d4"), knight, sq("d6")));
    }

    #[test]
    fn test_rook_blocked() {
        let position = Position::from_fen("4k3/8/8/3p4/8/8/3R4/4K3 w - - 0 1").unwrap();
        let rook = Piece::new(PieceKind::Rook, Color::White);

        // 可以吃 d5，但不能越过
        assert!(MoveGenerator::can_reach(&position, sq("d2"), rook, sq("d5")));
        assert!(!MoveGenerator::can_reach(&position, sq("d2"), rook, sq("d6")));
        assert!(!MoveGenerator::can_reach(&position, sq("d2"), rook, sq("e3")));
    }

    #[test]
    fn test_bishop_and_queen_paths() {
        let position = Position::from_fen("4k3/8/8/8/8/2P5/1B6/Q3K3 w - - 0 1").unwrap();
        let bishop = Piece::new(PieceKind::Bishop, Color::White);
        let queen = Piece::new(PieceKind::Queen, Color::White);

        assert!(MoveGenerator::can_reach(&position, sq("b2"), bishop, sq("a3")));
        assert!(!MoveGenerator::can_reach(&position, sq("b2"), bishop, sq("d4")));
        assert!(MoveGenerator::can_reach(&position, sq("a1"), queen, sq("a8")));
        assert!(!MoveGenerator::can_reach(&position, sq("a1"), queen, sq("c3")));
        assert!(!MoveGenerator::can_reach(&position, sq("a1"), queen, sq("b3")));
    }

    #[test]
    fn test_pawn_pushes() {
        let position = Position::from_fen("4k3/8/8/8/8/4n3/3P4/4K3 w - - 0 1").unwrap();
        let pawn = Piece::new(PieceKind::Pawn, Color::White);

        assert!(MoveGenerator::can_reach(&position, sq("d2"), pawn, sq("d3")));
        assert!(MoveGenerator::can_reach(&position, sq("d2"), pawn, sq("d4")));
        assert!(MoveGenerator::can_reach(&position, sq("d2"), pawn, sq("e3")));
        assert!(!MoveGenerator::can_reach(&position, sq("d2"), pawn, sq("c3")));
        assert!(!MoveGenerator::can_reach(&position, sq("d2"), pawn, sq("d1")));

        // 双步被挡
        let blocked = Position::from_fen("4k3/8/8/8/8/3n4/3P4/4K3 w - - 0 1").unwrap();
        assert!(!MoveGenerator::can_reach(&blocked, sq("d2"), pawn, sq("d3")));
        assert!(!MoveGenerator::can_reach(&blocked, sq("d2"), pawn, sq("d4")));
    }

    #[test]
    fn test_en_passant() {
        let position =
            Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let pawn = Piece::new(PieceKind::Pawn, Color::White);

        assert!(MoveGenerator::can_reach(&position, sq("e5"), pawn, sq("d6")));
        let mv = MoveGenerator::classify(&position, PieceKind::Pawn, sq("e5"), sq("d6"), None);
        assert_eq!(mv.kind, MoveKind::EnPassant);
        assert_eq!(mv.captured, Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert!(MoveGenerator::validate(&position, &mv).is_ok());

        // 没有过路兵格时不能斜走到空格
        let stale = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2").unwrap();
        assert!(!MoveGenerator::can_reach(&stale, sq("e5"), pawn, sq("d6")));
    }

    #[test]
    fn test_promotions_expanded() {
        let position = Position::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = MoveGenerator::generate_legal(&position);
        let promotions: Vec<&Move> = moves
            .iter()
            .filter(|m| m.kind == MoveKind::Promotion)
            .collect();
        // a8 四种升变 + 吃 b8 四种升变
        assert_eq!(promotions.len(), 8);
        assert!(promotions
            .iter()
            .any(|m| m.to == sq("b8") && m.captured.is_some() && m.promotion == Some(PieceKind::Knight)));
    }

    #[test]
    fn test_check_detection() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1").unwrap();
        assert!(MoveGenerator::is_in_check(&position.board, Color::Black));
        assert!(!MoveGenerator::is_in_check(&position.board, Color::White));

        // 兵只斜向攻击
        let pawn_front = Position::from_fen("8/8/8/8/8/4k3/4P3/4K3 w - - 0 1").unwrap();
        assert!(!MoveGenerator::is_in_check(&pawn_front.board, Color::Black));
        let pawn_diag = Position::from_fen("8/8/8/8/8/3k4/4P3/4K3 w - - 0 1").unwrap();
        assert!(MoveGenerator::is_in_check(&pawn_diag.board, Color::Black));
    }

    #[test]
    fn test_pinned_piece_rejected() {
        // e2 的马被 e8 的车钉住
        let position = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let mv = MoveGenerator::classify(&position, PieceKind::Knight, sq("e2"), sq("c3"), None);
        assert_eq!(
            MoveGenerator::validate(&position, &mv),
            Err(ChessError::LeavesKingInCheck)
        );
    }

    #[test]
    fn test_castling_eligibility() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(MoveGenerator::check_castle(&position, true).is_ok());
        assert!(MoveGenerator::check_castle(&position, false).is_ok());

        // f1 被车攻击：王翼易位要经过 f1
        let attacked = Position::from_fen("5r1k/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            MoveGenerator::check_castle(&attacked, true),
            Err(ChessError::LeavesKingInCheck)
        );
        assert!(MoveGenerator::check_castle(&attacked, false).is_ok());

        // 被将军时不能易位
        let in_check = Position::from_fen("4r2k/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            MoveGenerator::check_castle(&in_check, true),
            Err(ChessError::LeavesKingInCheck)
        );

        // b1 被占，只影响后翼
        let blocked = Position::from_fen("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1").unwrap();
        assert!(matches!(
            MoveGenerator::check_castle(&blocked, false),
            Err(ChessError::IllegalMove { .. })
        ));
        assert!(MoveGenerator::check_castle(&blocked, true).is_ok());

        // 没有易位权
        let no_rights = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        assert!(matches!(
            MoveGenerator::check_castle(&no_rights, true),
            Err(ChessError::IllegalMove { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_wrong_piece() {
        let position = Position::initial();

        let empty_origin = Move::new(PieceKind::Knight, sq("e4"), sq("e5"));
        assert!(matches!(
            MoveGenerator::validate(&position, &empty_origin),
            Err(ChessError::IllegalMove { .. })
        ));

        let enemy = Move::new(PieceKind::Knight, sq("g8"), sq("f6"));
        assert!(matches!(
            MoveGenerator::validate(&position, &enemy),
            Err(ChessError::IllegalMove { .. })
        ));

        let wrong_kind = Move::new(PieceKind::Bishop, sq("g1"), sq("f3"));
        assert!(matches!(
            MoveGenerator::validate(&position, &wrong_kind),
            Err(ChessError::IllegalMove { .. })
        ));

        // 类型与棋盘不一致
        let mislabelled = Move::new(PieceKind::Pawn, sq("e2"), sq("e4"));
        assert!(matches!(
            MoveGenerator::validate(&position, &mislabelled),
            Err(ChessError::IllegalMove { .. })
        ));
    }
}
