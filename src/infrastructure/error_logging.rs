use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 目录读取错误
    DirectoryList,
    /// 元数据读取错误
    Metadata,
    /// 文件读取错误
    FileRead,
    /// 文件写入错误
    FileWrite,
    /// 时间戳更新错误
    Timestamp,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DirectoryList => "目录读取",
            ErrorType::Metadata => "元数据读取",
            ErrorType::FileRead => "文件读取",
            ErrorType::FileWrite => "文件写入",
            ErrorType::Timestamp => "时间戳更新",
        }
    }
}

/// 错误日志记录器
pub struct ErrorLogger {
    error_file: Mutex<Option<File>>,
    error_path: PathBuf,
    enabled: bool,
    error_counts: Mutex<HashMap<ErrorType, usize>>,
}

impl ErrorLogger {
    /// 创建新的错误日志记录器
    pub fn new(enabled: bool, log_dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                error_file: Mutex::new(None),
                error_path: PathBuf::new(),
                enabled: false,
                error_counts: Mutex::new(HashMap::new()),
            });
        }

        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");

        fs::create_dir_all(log_dir)
            .with_context(|| format!("无法创建日志目录: {}", log_dir.display()))?;
        let error_path = log_dir.join(format!("finder_error_{}.log", timestamp));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)
            .with_context(|| format!("无法创建错误日志文件: {}", error_path.display()))?;

        file.write_all(&[0xEF, 0xBB, 0xBF])?; // UTF-8 BOM
        writeln!(file, "# FileFinder 错误日志")?;
        writeln!(file, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "# ============================================")?;
        writeln!(file)?;

        Ok(Self {
            error_file: Mutex::new(Some(file)),
            error_path,
            enabled: true,
            error_counts: Mutex::new(HashMap::new()),
        })
    }

    /// 记录错误
    pub fn log_error(
        &self,
        error_type: ErrorType,
        file_path: Option<&Path>,
        message: &str,
        details: Option<&str>,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut counts) = self.error_counts.lock() {
            *counts.entry(error_type).or_insert(0) += 1;
        }

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), message)?;

                if let Some(path) = file_path {
                    writeln!(file, "  文件路径: {}", path.display())?;
                }

                if let Some(detail) = details {
                    writeln!(file, "  详细信息: {}", detail)?;
                }

                writeln!(file)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    /// 获取错误统计信息
    pub fn get_error_summary(&self) -> HashMap<ErrorType, usize> {
        self.error_counts
            .lock()
            .map(|counts| counts.clone())
            .unwrap_or_default()
    }

    /// 获取总错误数
    pub fn get_total_errors(&self) -> usize {
        self.get_error_summary().values().sum()
    }

    pub fn has_errors(&self) -> bool {
        self.get_total_errors() > 0
    }

    /// 完成错误日志记录
    pub fn finalize(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let summary = self.get_error_summary();
        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# ============================================")?;
                writeln!(file, "# 结束时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;

                if summary.is_empty() {
                    writeln!(file, "# 无错误记录")?;
                } else {
                    writeln!(file, "# 错误统计:")?;
                    for (error_type, count) in &summary {
                        writeln!(file, "#   {}: {} 次", error_type.as_str(), count)?;
                    }
                    writeln!(file, "#   总计: {} 个错误", summary.values().sum::<usize>())?;
                }

                file.flush()?;
            }
        }

        Ok(())
    }

    /// 打印错误摘要到标准错误
    pub fn print_error_summary(&self) {
        if !self.has_errors() {
            return;
        }

        eprintln!("\n运行过程中发生错误:");
        eprintln!("----------------------------");
        for (error_type, count) in &self.get_error_summary() {
            eprintln!("  {}: {} 次", error_type.as_str(), count);
        }
        eprintln!("  总计: {} 个错误", self.get_total_errors());
        eprintln!("  详细错误信息请查看: {}", self.error_path.display());
    }
}
