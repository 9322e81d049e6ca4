//! 走法执行
//!
//! 先完整验证，再一次性更新局面；被拒绝的走法不改变任何状态。

use tracing::debug;

use crate::board::Position;
use crate::constants::{KINGSIDE_ROOK_FILE, QUEENSIDE_ROOK_FILE};
use crate::error::Result;
use crate::moves::{Move, MoveGenerator, MoveKind};
use crate::notation::Notation;
use crate::outcome::Adjudicator;
use crate::piece::{Color, PieceKind, Square};

impl Position {
    /// 执行走法，返回带将军后缀的标准 SAN
    pub fn apply(&mut self, mv: &Move) -> Result<String> {
        MoveGenerator::validate(self, mv)?;

        let side = self.side_to_move;
        let mut san = Notation::encode(self, mv);

        let mut next = self.clone();
        MoveGenerator::play_on_board(&mut next.board, mv, side);
        next.update_castling(mv, side);

        next.en_passant = if mv.kind == MoveKind::DoublePawnPush {
            Some(Square::new_unchecked(mv.from.file, (mv.from.row + mv.to.row) / 2))
        } else {
            None
        };

        if mv.piece == PieceKind::Pawn || mv.is_capture() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock = next.halfmove_clock.saturating_add(1);
        }
        if side == Color::Black {
            next.fullmove_number = next.fullmove_number.saturating_add(1);
        }
        next.side_to_move = side.opponent();

        if Adjudicator::is_checkmate(&next) {
            san.push('#');
        } else if next.is_check() {
            san.push('+');
        }

        next.position_history.push(next.snapshot());
        next.move_history.push(san.clone());

        debug!("{} played {} -> {}", side.name(), san, next.fen());
        *self = next;
        Ok(san)
    }

    /// 解码 SAN 文本并执行
    pub fn play(&mut self, text: &str) -> Result<String> {
        let mv = Notation::decode(self, text)?;
        self.apply(&mv)
    }

    fn update_castling(&mut self, mv: &Move, side: Color) {
        if mv.piece == PieceKind::King {
            self.castling.uncastle(side);
        }

        // 车离开或在原位被吃，都会失去对应一侧的易位权
        for (sq, color) in [(mv.from, side), (mv.to, side.opponent())] {
            if sq.row != color.back_row() {
                continue;
            }
            match sq.file {
                KINGSIDE_ROOK_FILE => self.castling.uncastle_kingside(color),
                QUEENSIDE_ROOK_FILE => self.castling.uncastle_queenside(color),
                _ => {}
            }
        }
    }
}
