//! 与 LLM 对弈的终端程序
//!
//! 包含:
//! - 棋盘渲染
//! - 用户输入解析
//! - 对局会话
//! - 设置持久化

mod game;
mod input;
mod render;
mod settings;

pub use game::Game;
pub use input::{help_text, parse_color, parse_user_input, Command, InputError, UserInput};
pub use render::BoardRenderer;
pub use settings::{LogLevel, Settings};
