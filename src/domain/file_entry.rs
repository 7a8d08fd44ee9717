use std::fs::{self, File, Metadata};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bstr::ByteVec;

use super::error::PipelineError;

/// 文件内容的解码结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextContent {
    /// 合法的 UTF-8 文本
    Text(String),
    /// 无法解码为文本
    NotText,
}

impl TextContent {
    /// 从原始字节解码
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        bytes
            .into_string()
            .map_or(TextContent::NotText, TextContent::Text)
    }

    /// 第一行内容（`\n`、`\r\n` 和单独的 `\r` 都是换行符，去掉行尾空白）
    pub fn first_line(&self) -> Option<&str> {
        match self {
            TextContent::Text(text) => {
                Some(text.split(&['\n', '\r'][..]).next().unwrap_or("").trim_end())
            }
            TextContent::NotText => None,
        }
    }
}

/// 遍历得到的单个文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: String,
    extension: String,
    size: u64,
    modified: SystemTime,
}

impl FileEntry {
    /// 读取元数据并创建条目（跟随符号链接）
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let path = path.into();
        let metadata = fs::metadata(&path).map_err(|source| PipelineError::Metadata {
            path: path.clone(),
            source,
        })?;
        Self::from_metadata(path, &metadata)
    }

    /// 使用已获取的元数据创建条目
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Result<Self, PipelineError> {
        let modified = metadata.modified().map_err(|source| PipelineError::Metadata {
            path: path.clone(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = match path.extension() {
            Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
            _ => String::new(),
        };

        Ok(Self {
            name,
            extension,
            size: metadata.len(),
            modified,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件名（含扩展名）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 扩展名，带前导 `.`；没有扩展名时为空字符串
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// 打开文件用于读取
    pub fn open(&self) -> Result<File, PipelineError> {
        File::open(&self.path).map_err(|source| self.read_error(source))
    }

    /// 读取全部字节
    pub fn read_bytes(&self) -> Result<Vec<u8>, PipelineError> {
        let mut file = self.open()?;
        let mut bytes = Vec::with_capacity(self.size as usize);
        file.read_to_end(&mut bytes)
            .map_err(|source| self.read_error(source))?;
        Ok(bytes)
    }

    /// 读取并解码为文本，解码失败不是错误
    pub fn read_text(&self) -> Result<TextContent, PipelineError> {
        self.read_bytes().map(TextContent::from_bytes)
    }

    fn read_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::Read {
            path: self.path.clone(),
            source,
        }
    }
}
