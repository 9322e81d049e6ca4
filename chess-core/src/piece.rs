//! 棋子与格子定义

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// 兵可以升变成的棋子
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// SAN 中使用的大写字母
    pub fn to_char(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// 从字母解析（大小写均可）
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// 是否为轻子（马、象）
    pub fn is_minor(&self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop)
    }
}

/// 执子方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// 白方（先手，在下方）
    White,
    /// 黑方（后手，在上方）
    Black,
}

impl Color {
    /// 获取对方
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }

    /// 兵前进方向（行号增量，第 0 行是第 8 横线）
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// 兵的初始行
    pub fn pawn_home_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// 兵升变的行
    pub fn promotion_row(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// 王和车的初始行
    pub fn back_row(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// 获取 FEN 字符（白方大写，黑方小写）
    pub fn to_fen_char(&self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        PieceKind::from_char(c).map(|kind| Piece { kind, color })
    }

    /// 显示用的 Unicode 棋子符号（黑方实心，白方空心）
    pub fn display_char(&self) -> char {
        match (self.color, self.kind) {
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::White, PieceKind::Pawn) => '♙',
        }
    }
}

/// 棋盘格子
///
/// `row` 按 FEN 顺序计数：第 0 行是第 8 横线（顶部），`file` 0 是 a 列。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    /// 列 (0-7, a-h)
    pub file: u8,
    /// 行 (0-7, 第 8 横线到第 1 横线)
    pub row: u8,
}

impl Square {
    /// 创建新格子
    pub fn new(file: u8, row: u8) -> Option<Self> {
        if (file as usize) < BOARD_WIDTH && (row as usize) < BOARD_HEIGHT {
            Some(Self { file, row })
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，内部使用）
    pub const fn new_unchecked(file: u8, row: u8) -> Self {
        Self { file, row }
    }

    /// 解析代数坐标，如 "e4"
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = Self::file_from_char(chars.next()?)?;
        let row = Self::row_from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self { file, row })
    }

    /// 'a'..='h' 转换为列号
    pub fn file_from_char(c: char) -> Option<u8> {
        match c {
            'a'..='h' => Some(c as u8 - b'a'),
            _ => None,
        }
    }

    /// '1'..='8' 转换为行号
    pub fn row_from_char(c: char) -> Option<u8> {
        match c {
            '1'..='8' => Some(b'8' - c as u8),
            _ => None,
        }
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.file) as char
    }

    pub fn rank_char(&self) -> char {
        (b'8' - self.row) as char
    }

    /// 获取偏移后的格子
    pub fn offset(&self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let row = self.row as i8 + dr;
        if file >= 0 && (file as usize) < BOARD_WIDTH && row >= 0 && (row as usize) < BOARD_HEIGHT {
            Some(Square {
                file: file as u8,
                row: row as u8,
            })
        } else {
            None
        }
    }

    /// 是否为浅色格
    pub fn is_light(&self) -> bool {
        (self.file + self.row) % 2 == 0
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_WIDTH + self.file as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_WIDTH * BOARD_HEIGHT {
            Some(Square {
                file: (index % BOARD_WIDTH) as u8,
                row: (index / BOARD_WIDTH) as u8,
            })
        } else {
            None
        }
    }

    /// 按 FEN 顺序遍历所有格子（a8, b8, ..., h1）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_WIDTH * BOARD_HEIGHT).filter_map(Square::from_index)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}
