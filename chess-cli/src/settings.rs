//! 设置模块
//!
//! 提供设置数据结构与 JSON 持久化

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chess_llm::ChatConfig;
use serde::{Deserialize, Serialize};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// 作为 `EnvFilter` 指令使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// 程序设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === 显示设置 ===
    /// 显示坐标和局面信息
    pub guide: bool,
    /// 使用字母棋子
    pub ascii: bool,

    // === LLM 设置 ===
    pub chat: ChatConfig,
    /// 每步最多请求次数
    pub max_retries: u32,
    /// 在提示中列出合法走法
    pub offer_legal_moves: bool,

    // === 高级设置 ===
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            guide: true,
            ascii: false,
            chat: ChatConfig::default(),
            max_retries: 3,
            offer_legal_moves: true,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// 获取设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("llm-chess");
            path.push("settings.json");
            path
        })
    }

    /// 从默认位置加载设置
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("Could not determine config directory, using default settings");
                Self::default()
            }
        }
    }

    /// 从指定文件加载设置，文件缺失或无效时使用默认值
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("Settings file {:?} not found, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("Invalid settings file {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read settings file {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// 保存设置到默认位置
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().context("Could not determine config directory")?;
        self.save_to(&path)
    }

    /// 保存设置到指定文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings file {:?}", path))?;

        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// 叠加环境变量后的 LLM 配置
    pub fn chat_config(&self) -> ChatConfig {
        self.chat.clone().with_env()
    }
}
