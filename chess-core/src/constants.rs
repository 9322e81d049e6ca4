//! 规则常量定义

/// 棋盘宽度（列数）
pub const BOARD_WIDTH: usize = 8;

/// 棋盘高度（行数）
pub const BOARD_HEIGHT: usize = 8;

/// 五十步规则的半回合阈值（双方各 50 步）
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// 三次重复局面判和的次数
pub const REPETITION_COUNT: usize = 3;

/// 王的初始列（e 列）
pub const KING_HOME_FILE: u8 = 4;

/// 王翼车的初始列（h 列）
pub const KINGSIDE_ROOK_FILE: u8 = 7;

/// 后翼车的初始列（a 列）
pub const QUEENSIDE_ROOK_FILE: u8 = 0;
