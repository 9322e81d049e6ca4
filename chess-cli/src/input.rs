//! 用户输入解析

use chess_core::Color;
use thiserror::Error;

/// 交互命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    /// 打印当前 FEN
    Fen,
    /// 打印棋谱
    History,
    /// 列出合法走法
    Moves,
    /// 认输，对手获胜
    Resign,
    Quit,
}

impl Command {
    fn from_word(word: &str) -> Option<Command> {
        match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Some(Command::Help),
            "fen" => Some(Command::Fen),
            "history" => Some(Command::History),
            "moves" => Some(Command::Moves),
            "resign" => Some(Command::Resign),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// 一行用户输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    /// 走法文本，交给 SAN 解码器
    Move(String),
    Command(Command),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Empty input")]
    Empty,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// 解析一行输入；以 `/` 开头的必须是命令
pub fn parse_user_input(line: &str) -> Result<UserInput, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(InputError::Empty);
    }

    if let Some(word) = line.strip_prefix('/') {
        return Command::from_word(word.trim())
            .map(UserInput::Command)
            .ok_or_else(|| InputError::UnknownCommand(line.to_string()));
    }

    Ok(match Command::from_word(line) {
        Some(command) => UserInput::Command(command),
        None => UserInput::Move(line.to_string()),
    })
}

/// 解析执棋颜色选择（`w` / `b`）
pub fn parse_color(line: &str) -> Option<Color> {
    match line.trim().to_ascii_lowercase().as_str() {
        "w" | "white" => Some(Color::White),
        "b" | "black" => Some(Color::Black),
        _ => None,
    }
}

/// 帮助文本
pub fn help_text() -> &'static str {
    "Enter a move in SAN (e.g. e4, Nf3, exd5, O-O, e8=Q).\n\
     Commands: help, fen, history, moves, resign, quit"
}
