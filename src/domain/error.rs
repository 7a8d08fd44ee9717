use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::infrastructure::ErrorType;

/// 输入格式错误（由提示循环负责重新提示，不进入处理流程）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputFormatError {
    /// 输入过短
    #[error("输入过短: {0:?}")]
    TooShort(String),
    /// 未知的命令前缀
    #[error("未知的命令前缀: {0:?}")]
    UnknownPrefix(String),
    /// 路径不存在
    #[error("路径不存在: {}", .0.display())]
    PathNotFound(PathBuf),
    /// 大小值不是十进制数字
    #[error("无效的大小值: {0:?}")]
    InvalidSize(String),
    /// 未知的操作
    #[error("未知的操作: {0:?}")]
    UnknownAction(String),
}

/// 文件系统错误，一旦发生即终止本次运行
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("无法列出目录: {}", path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },
    #[error("无法获取文件元数据: {}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("无法读取文件: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("无法写入文件: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("无法更新时间戳: {}", path.display())]
    Touch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("无法写入输出")]
    Output(#[source] io::Error),
}

impl PipelineError {
    /// 出错的路径（输出错误没有路径）
    pub fn path(&self) -> Option<&Path> {
        match self {
            PipelineError::ListDirectory { path, .. }
            | PipelineError::Metadata { path, .. }
            | PipelineError::Read { path, .. }
            | PipelineError::Write { path, .. }
            | PipelineError::Touch { path, .. } => Some(path),
            PipelineError::Output(_) => None,
        }
    }

    /// 错误日志中的分类
    pub fn error_type(&self) -> ErrorType {
        match self {
            PipelineError::ListDirectory { .. } => ErrorType::DirectoryList,
            PipelineError::Metadata { .. } => ErrorType::Metadata,
            PipelineError::Read { .. } => ErrorType::FileRead,
            PipelineError::Write { .. } | PipelineError::Output(_) => ErrorType::FileWrite,
            PipelineError::Touch { .. } => ErrorType::Timestamp,
        }
    }
}
