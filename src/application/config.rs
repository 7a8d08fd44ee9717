use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用程序配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 日志相关配置
    pub logging: LoggingConfig,
    /// 显示相关配置
    pub display: DisplayConfig,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 是否写入会话日志和错误日志
    pub enabled: bool,
    /// 日志文件所在目录
    pub directory: String,
}

/// 显示配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 结束时在标准错误输出摘要
    pub show_summary: bool,
    /// 遍历时在标准错误显示进度
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: ".".to_string(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// 序列化为 TOML 文本
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("无法序列化配置")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.logging.directory)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.logging.directory.trim().is_empty() {
            anyhow::bail!("logging.directory 不能为空");
        }

        Ok(())
    }
}
