//! 国际象棋局面与记谱引擎
//!
//! 包含:
//! - 棋子、格子、棋盘、局面等核心数据结构
//! - FEN 解析与生成
//! - SAN 记谱解码与编码
//! - 走法合法性验证与完整合法走法生成
//! - 走法执行（易位权、吃过路兵、步数计数、历史）
//! - 终局判定（将死、逼和、三次重复、五十步、子力不足）
//! - 棋谱记录（JSON）

mod board;
mod castling;
mod constants;
mod error;
mod executor;
mod fen;
mod moves;
mod notation;
mod outcome;
mod piece;
mod record;

pub use board::{Board, Position};
pub use castling::CastlingRights;
pub use constants::*;
pub use error::{ChessError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use moves::{Move, MoveGenerator, MoveKind};
pub use notation::Notation;
pub use outcome::{Adjudicator, DrawReason, GameResult, WinReason};
pub use piece::{Color, Piece, PieceKind, Square};
pub use record::{GameMetadata, GameRecord, MoveRecord};
