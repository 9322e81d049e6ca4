//! 错误类型定义

use thiserror::Error;

/// 国际象棋规则错误
///
/// 所有错误都可在调用方恢复：被拒绝的走法不会修改局面或历史。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 无效的 FEN 字符串
    #[error("Malformed FEN: {reason}")]
    MalformedFen { reason: String },

    /// 记谱文本不符合 SAN 语法
    #[error("Syntax error in move text: {san:?}")]
    SyntaxError { san: String },

    /// 语法正确，但找不到唯一能走这步棋的棋子
    #[error("No unique origin for {san:?} ({candidates} candidates)")]
    NoOriginFound { san: String, candidates: usize },

    /// 兵到达底线却没有指定升变棋子
    #[error("Missing promotion piece in {san:?}")]
    MissingPromotion { san: String },

    /// 不是升变却带有升变后缀
    #[error("Unexpected promotion suffix in {san:?}")]
    UnexpectedPromotion { san: String },

    /// 走法会导致己方王被将军
    #[error("Move would leave king in check")]
    LeavesKingInCheck,

    /// 其他非法走法（路径受阻、走法几何不符、易位条件不满足等）
    #[error("Illegal move: {reason}")]
    IllegalMove { reason: String },
}

impl ChessError {
    pub(crate) fn malformed_fen(reason: impl Into<String>) -> Self {
        ChessError::MalformedFen {
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        ChessError::IllegalMove {
            reason: reason.into(),
        }
    }
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
