//! LLM 提示模板
//!
//! 定义用于与 LLM 交互的提示格式，包括：
//! - 局面快照（棋盘、走子方、FEN、棋谱）
//! - 回复格式要求
//! - 可选的合法走法列表

use chess_core::{Board, Color, MoveGenerator, Position, Square, BOARD_HEIGHT, BOARD_WIDTH};

use crate::client::ChatMessage;

/// 发给 LLM 的只读局面快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// 棋盘文字图
    pub board: String,
    pub side: Color,
    pub fen: String,
    /// `1.e4 1...e5` 形式的棋谱
    pub transcript: String,
    /// 合法走法的 SAN 列表（可选）
    pub legal_moves: Option<Vec<String>>,
}

impl MoveRequest {
    /// 从局面生成快照
    pub fn from_position(position: &Position, offer_legal_moves: bool) -> Self {
        let legal_moves = offer_legal_moves.then(|| {
            MoveGenerator::generate_legal(position)
                .iter()
                .filter_map(|mv| position.clone().apply(mv).ok())
                .collect()
        });

        Self {
            board: PromptTemplate::visualize_board(&position.board),
            side: position.side_to_move,
            fen: position.fen(),
            transcript: position.transcript(),
            legal_moves,
        }
    }
}

/// LLM 提示模板
pub struct PromptTemplate;

impl PromptTemplate {
    /// 生成走法请求的系统提示
    pub fn move_request(request: &MoveRequest) -> String {
        let history = if request.transcript.is_empty() {
            "(no moves yet)"
        } else {
            request.transcript.as_str()
        };

        let mut prompt = format!(
            "You are playing chess as {side}.\n\
             You MUST answer in the following format:\n\
             \n\
             SAN (Standard Algebraic Notation) of the move you want to make.\n\
             A short comment about the move.\n\
             \n\
             Example:\n\
             \n\
             Nf3\n\
             Develops the knight toward the center and prepares castling.\n\
             \n\
             This is the current state of the board (white pieces are uppercase/hollow, \
             rank 8 is at the top):\n\
             \n\
             {board}\n\
             This is the FEN of the board:\n\
             \n\
             {fen}\n\
             \n\
             This is the history of the moves:\n\
             \n\
             {history}\n",
            side = request.side.name(),
            board = request.board,
            fen = request.fen,
            history = history,
        );

        if let Some(ref legal) = request.legal_moves {
            prompt.push_str(
                "\nThese are the legal moves you can make. You MUST choose one of these moves:\n\n",
            );
            prompt.push_str(&legal.join(", "));
            prompt.push('\n');
        }

        prompt
    }

    /// 组装对话消息
    pub fn messages(request: &MoveRequest) -> Vec<ChatMessage> {
        vec![ChatMessage::system(Self::move_request(request))]
    }

    /// 上一次回复被拒绝时追加的提示
    pub fn rejection(reply: &str, error: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::assistant(reply),
            ChatMessage::user(format!(
                "That answer was rejected: {}. Reply again with a legal move in the required format.",
                error
            )),
        ]
    }

    /// 可视化棋盘（带坐标）
    pub fn visualize_board(board: &Board) -> String {
        let mut result = String::new();

        for row in 0..BOARD_HEIGHT as u8 {
            let sq = Square::new_unchecked(0, row);
            result.push(sq.rank_char());
            result.push(' ');
            for file in 0..BOARD_WIDTH as u8 {
                let ch = board
                    .get(Square::new_unchecked(file, row))
                    .map_or('.', |piece| piece.display_char());
                result.push(ch);
                result.push(' ');
            }
            result.pop();
            result.push('\n');
        }
        result.push_str("  a b c d e f g h\n");

        result
    }
}
