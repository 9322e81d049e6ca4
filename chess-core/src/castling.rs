//! 易位权

use serde::{Deserialize, Serialize};

use crate::piece::Color;

const WHITE_KINGSIDE: u8 = 0b1000;
const WHITE_QUEENSIDE: u8 = 0b0100;
const BLACK_KINGSIDE: u8 = 0b0010;
const BLACK_QUEENSIDE: u8 = 0b0001;

/// 四个易位标志；只会被清除，不会被恢复
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// 全部易位权
    pub fn all() -> Self {
        CastlingRights(0b1111)
    }

    /// 无易位权
    pub fn none() -> Self {
        CastlingRights(0)
    }

    /// 从 FEN 易位字段解析；只接受 `-` 或 `KQkq` 的组合
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(Self::none());
        }
        if s.is_empty() {
            return None;
        }
        let mut res = Self::none();
        for c in s.chars() {
            res.0 |= match c {
                'K' => WHITE_KINGSIDE,
                'Q' => WHITE_QUEENSIDE,
                'k' => BLACK_KINGSIDE,
                'q' => BLACK_QUEENSIDE,
                _ => return None,
            };
        }
        Some(res)
    }

    fn kingside_flag(side: Color) -> u8 {
        match side {
            Color::White => WHITE_KINGSIDE,
            Color::Black => BLACK_KINGSIDE,
        }
    }

    fn queenside_flag(side: Color) -> u8 {
        match side {
            Color::White => WHITE_QUEENSIDE,
            Color::Black => BLACK_QUEENSIDE,
        }
    }

    pub fn kingside(&self, side: Color) -> bool {
        self.0 & Self::kingside_flag(side) != 0
    }

    pub fn queenside(&self, side: Color) -> bool {
        self.0 & Self::queenside_flag(side) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// 取消一方的全部易位权
    pub fn uncastle(&mut self, side: Color) {
        self.0 &= !(Self::kingside_flag(side) | Self::queenside_flag(side));
    }

    /// 取消一方的王翼易位权
    pub fn uncastle_kingside(&mut self, side: Color) {
        self.0 &= !Self::kingside_flag(side);
    }

    /// 取消一方的后翼易位权
    pub fn uncastle_queenside(&mut self, side: Color) {
        self.0 &= !Self::queenside_flag(side);
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

impl std::fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (flag, c) in [
            (WHITE_KINGSIDE, 'K'),
            (WHITE_QUEENSIDE, 'Q'),
            (BLACK_KINGSIDE, 'k'),
            (BLACK_QUEENSIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fen() {
        let rights = CastlingRights::from_fen("KQkq").unwrap();
        assert_eq!(rights, CastlingRights::all());

        let rights = CastlingRights::from_fen("Kq").unwrap();
        assert!(rights.kingside(Color::White));
        assert!(!rights.queenside(Color::White));
        assert!(!rights.kingside(Color::Black));
        assert!(rights.queenside(Color::Black));

        assert_eq!(CastlingRights::from_fen("-"), Some(CastlingRights::none()));
        assert!(CastlingRights::from_fen("KX").is_none());
        assert!(CastlingRights::from_fen("").is_none());
        assert!(CastlingRights::from_fen("K-").is_none());
    }

    #[test]
    fn test_display_canonical_order() {
        let rights = CastlingRights::from_fen("qkQK").unwrap();
        assert_eq!(rights.to_string(), "KQkq");
        assert_eq!(CastlingRights::none().to_string(), "-");
    }

    #[test]
    fn test_uncastle() {
        let mut rights = CastlingRights::all();
        rights.uncastle(Color::White);
        assert_eq!(rights.to_string(), "kq");

        rights.uncastle_queenside(Color::Black);
        assert_eq!(rights.to_string(), "k");

        rights.uncastle_kingside(Color::Black);
        assert!(rights.is_empty());
    }
}
