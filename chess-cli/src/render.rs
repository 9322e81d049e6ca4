//! 终端棋盘渲染

use chess_core::{Position, Square, BOARD_HEIGHT, BOARD_WIDTH};

/// 棋盘渲染器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardRenderer {
    /// 显示坐标和局面信息
    pub guide: bool,
    /// 使用 FEN 字母代替 Unicode 棋子
    pub ascii: bool,
}

impl BoardRenderer {
    pub fn new(guide: bool, ascii: bool) -> Self {
        Self { guide, ascii }
    }

    /// 渲染局面，第 8 横线在最上方
    pub fn render(&self, position: &Position) -> String {
        let mut out = String::new();

        for row in 0..BOARD_HEIGHT as u8 {
            if self.guide {
                out.push_str(&format!("{} | ", Square::new_unchecked(0, row).rank_char()));
            }
            let cells: Vec<String> = (0..BOARD_WIDTH as u8)
                .map(|file| {
                    let cell = match position.board.get(Square::new_unchecked(file, row)) {
                        Some(piece) if self.ascii => piece.to_fen_char(),
                        Some(piece) => piece.display_char(),
                        None => '.',
                    };
                    cell.to_string()
                })
                .collect();
            out.push_str(&cells.join(" "));
            out.push('\n');
        }

        if self.guide {
            out.push_str(&self.status(position));
        }

        out
    }

    fn status(&self, position: &Position) -> String {
        let en_passant = position
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        let mut out = String::new();
        out.push_str("    ---------------\n");
        out.push_str("    A B C D E F G H\n\n");
        out.push_str(&format!("Turn:{:>15}\n", position.side_to_move.to_fen_char()));
        out.push_str(&format!("Castling:{:>11}\n", position.castling.to_string()));
        out.push_str(&format!("En Passant:{:>9}\n", en_passant));
        out.push_str(&format!("Halfmove:{:>11}\n", position.halfmove_clock));
        out.push_str(&format!("Fullmove:{:>11}\n\n", position.fullmove_number));
        out.push_str(&format!("FEN: {}\n\n", position.fen()));
        out.push_str(&format!("SAN: {}\n", position.transcript()));
        out
    }
}
