use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Result;
use humansize::{format_size, BINARY};

use crate::domain::{ActionSpec, FileEntry};

/// 格式化文件大小
pub fn format_file_size(size: u64) -> String {
    format_size(size, BINARY)
}

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 每行输出一个文件路径
pub fn print_paths<W: Write>(out: &mut W, files: &[FileEntry]) -> Result<()> {
    for entry in files {
        writeln!(out, "{}", entry.path().display())?;
    }
    out.flush()?;
    Ok(())
}

/// 会话摘要
#[derive(Debug)]
pub struct SearchSummary {
    pub start_time: Instant,
    pub listed_files: usize,
    pub matched_files: usize,
    pub matched_bytes: u64,
    pub action: Option<ActionSpec>,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            listed_files: 0,
            matched_files: 0,
            matched_bytes: 0,
            action: None,
        }
    }

    /// 记录搜索结果
    pub fn record_matches(&mut self, matched: &[FileEntry]) {
        self.matched_files = matched.len();
        self.matched_bytes = matched.iter().map(FileEntry::size).sum();
    }

    pub fn print<W: Write>(&self, out: &mut W) -> Result<()> {
        let action = self
            .action
            .map_or_else(|| "无".to_string(), |action| action.to_string());

        writeln!(out, "\n搜索摘要:")?;
        writeln!(out, "----------------------------")?;
        writeln!(out, "总用时: {}", format_duration(self.start_time.elapsed()))?;
        writeln!(out, "列出文件: {}", self.listed_files)?;
        writeln!(out, "匹配文件: {}", self.matched_files)?;
        writeln!(out, "匹配大小: {}", format_file_size(self.matched_bytes))?;
        writeln!(out, "执行操作: {}", action)?;

        Ok(())
    }
}

impl Default for SearchSummary {
    fn default() -> Self {
        Self::new()
    }
}
