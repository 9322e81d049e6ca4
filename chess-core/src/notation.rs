//! SAN 标准代数记谱法
//!
//! 格式：`[棋子][起始列][起始行][x]<目标列><目标行>[=升变][+/#]`，
//! 另有易位记号 `O-O` / `O-O-O`（大小写均可，也可写作 `0-0`）。
//!
//! 解码时起始格缺省的部分根据当前局面推断；吃子记号只作参考，
//! 实际走法类型以棋盘为准。

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::board::Position;
use crate::error::{ChessError, Result};
use crate::moves::{Move, MoveGenerator, MoveKind};
use crate::piece::{Piece, PieceKind, Square};

lazy_static! {
    static ref SAN_RE: Regex = Regex::new(
        r"^([PNBRQK])?([a-h])?([1-8])?([x:])?([a-h])([1-8])(?:\s*e\.?p\.?)?(=[NBRQnbrq]|[NBRQ])?([+#])?[!?]*$"
    )
    .unwrap();
    static ref CASTLE_RE: Regex = Regex::new(r"^[oO0]-[oO0](-[oO0])?([+#])?[!?]*$").unwrap();
}

/// SAN 解码与编码
pub struct Notation;

impl Notation {
    /// 将 SAN 文本解码为走法描述
    ///
    /// 起始格完整给出时原样使用，不在此处检查合法性；否则在当前局面中
    /// 寻找唯一一个能走到目标格的同类棋子。
    pub fn decode(position: &Position, text: &str) -> Result<Move> {
        let san = text.trim();
        let side = position.side_to_move;

        if let Some(cap) = CASTLE_RE.captures(san) {
            let kingside = cap.get(1).is_none();
            return Ok(MoveGenerator::castle_move(side, kingside));
        }

        let cap = SAN_RE.captures(san).ok_or_else(|| ChessError::SyntaxError {
            san: san.to_string(),
        })?;

        let char_of = |i: usize| cap.get(i).and_then(|m| m.as_str().chars().last());

        let piece = char_of(1)
            .and_then(PieceKind::from_char)
            .unwrap_or(PieceKind::Pawn);
        let from_file = char_of(2).and_then(Square::file_from_char);
        let from_row = char_of(3).and_then(Square::row_from_char);
        let to = match (
            char_of(5).and_then(Square::file_from_char),
            char_of(6).and_then(Square::row_from_char),
        ) {
            (Some(file), Some(row)) => Square::new_unchecked(file, row),
            _ => {
                return Err(ChessError::SyntaxError {
                    san: san.to_string(),
                })
            }
        };
        let promotion = char_of(7).and_then(PieceKind::from_char);

        let from = match (from_file, from_row) {
            (Some(file), Some(row)) => Square::new_unchecked(file, row),
            _ => Self::resolve_origin(position, san, piece, from_file, from_row, to, promotion)?,
        };

        let reaches_last_row = piece == PieceKind::Pawn && to.row == side.promotion_row();
        if reaches_last_row && promotion.is_none() {
            return Err(ChessError::MissingPromotion {
                san: san.to_string(),
            });
        }
        if !reaches_last_row && promotion.is_some() {
            return Err(ChessError::UnexpectedPromotion {
                san: san.to_string(),
            });
        }

        let mv = MoveGenerator::classify(position, piece, from, to, promotion);
        if char_of(4).is_some() != mv.is_capture() {
            debug!("Capture marker in {:?} disagrees with board, using {:?}", san, mv.kind);
        }
        debug!("Decoded {:?} as {} ({:?})", san, mv, mv.kind);
        Ok(mv)
    }

    /// 推断起始格：先按给出的坐标过滤，再看哪个棋子能走到目标格
    fn resolve_origin(
        position: &Position,
        san: &str,
        kind: PieceKind,
        from_file: Option<u8>,
        from_row: Option<u8>,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Square> {
        let side = position.side_to_move;
        let piece = Piece::new(kind, side);

        let candidates: Vec<Square> = position
            .board
            .pieces(side)
            .into_iter()
            .filter(|(from, p)| {
                p.kind == kind
                    && from_file.map_or(true, |file| from.file == file)
                    && from_row.map_or(true, |row| from.row == row)
                    && MoveGenerator::can_reach(position, *from, piece, to)
            })
            .map(|(from, _)| from)
            .collect();

        match candidates.len() {
            1 => Ok(candidates[0]),
            0 => Err(ChessError::NoOriginFound {
                san: san.to_string(),
                candidates: 0,
            }),
            n => {
                // 多个候选时排除被钉住的棋子
                let legal: Vec<Square> = candidates
                    .into_iter()
                    .filter(|&from| {
                        let mv = MoveGenerator::classify(position, kind, from, to, promotion);
                        !MoveGenerator::leaves_king_in_check(position, &mv)
                    })
                    .collect();
                if legal.len() == 1 {
                    Ok(legal[0])
                } else {
                    Err(ChessError::NoOriginFound {
                        san: san.to_string(),
                        candidates: n,
                    })
                }
            }
        }
    }

    /// 将走法编码为标准 SAN（不含将军后缀），`position` 为走子前的局面
    pub fn encode(position: &Position, mv: &Move) -> String {
        match mv.kind {
            MoveKind::CastleKingside => return "O-O".to_string(),
            MoveKind::CastleQueenside => return "O-O-O".to_string(),
            _ => {}
        }

        let mut san = String::new();

        if mv.piece == PieceKind::Pawn {
            if mv.is_capture() {
                san.push(mv.from.file_char());
                san.push('x');
            }
            san.push_str(&mv.to.to_string());
            if let Some(promotion) = mv.promotion {
                san.push('=');
                san.push(promotion.to_char());
            }
            return san;
        }

        san.push(mv.piece.to_char());
        san.push_str(&Self::disambiguation(position, mv));
        if mv.is_capture() {
            san.push('x');
        }
        san.push_str(&mv.to.to_string());
        san
    }

    /// 同类棋子也能合法走到同一目标格时，补充起始列、行或两者
    fn disambiguation(position: &Position, mv: &Move) -> String {
        let rivals: Vec<Square> = MoveGenerator::generate_legal(position)
            .into_iter()
            .filter(|m| m.piece == mv.piece && m.to == mv.to && m.from != mv.from)
            .map(|m| m.from)
            .collect();

        if rivals.is_empty() {
            String::new()
        } else if rivals.iter().all(|sq| sq.file != mv.from.file) {
            mv.from.file_char().to_string()
        } else if rivals.iter().all(|sq| sq.row != mv.from.row) {
            mv.from.rank_char().to_string()
        } else {
            mv.from.to_string()
        }
    }
}
