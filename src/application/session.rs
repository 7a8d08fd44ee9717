use std::io::{BufRead, Write};

use anyhow::Result;
use indicatif::ProgressBar;

use crate::domain::action::duplicate_path;
use crate::domain::file_walker::scan_spinner;
use crate::domain::{act, list_files_with_progress, search, ActionSpec, SearchRoot, SearchSpec};
use crate::infrastructure::LoggerTrait;
use crate::presentation::{print_paths, prompt_until_valid, SearchSummary};

/// 会话选项
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// 遍历时显示进度
    pub show_progress: bool,
}

/// 运行一次完整的交互：选择目录、搜索、执行操作
///
/// 搜索结果为空时不会读取第三个输入。文件系统错误直接返回，
/// 输入格式错误在提示循环内部处理。
pub fn run_session<R, W>(
    input: &mut R,
    output: &mut W,
    logger: &dyn LoggerTrait,
    options: SessionOptions,
) -> Result<SearchSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = SearchSummary::new();

    let root = prompt_until_valid(input, output, logger, |line| line.parse::<SearchRoot>())?;
    logger.log_message(&format!(
        "开始列出目录: {} (递归: {})",
        root.path.display(),
        root.recursive
    ))?;

    let progress = if options.show_progress {
        scan_spinner()
    } else {
        ProgressBar::hidden()
    };
    let files = list_files_with_progress(&root.path, root.recursive, &progress)?;
    for entry in &files {
        logger.log_file(entry.path(), entry.size(), "已列出")?;
    }
    summary.listed_files = files.len();
    print_paths(output, &files)?;

    let spec = prompt_until_valid(input, output, logger, |line| line.parse::<SearchSpec>())?;
    let matched = search(&files, &spec)?;
    logger.log_message(&format!("搜索条件: {} | 匹配 {} 个文件", spec, matched.len()))?;
    summary.record_matches(&matched);
    print_paths(output, &matched)?;

    if matched.is_empty() {
        return Ok(summary);
    }

    let action = prompt_until_valid(input, output, logger, |line| line.parse::<ActionSpec>())?;
    act(&matched, action, output)?;
    output.flush()?;
    for entry in &matched {
        let status = match action {
            ActionSpec::PrintFirstLine => "已输出首行".to_string(),
            ActionSpec::Duplicate => format!("已复制到 {}", duplicate_path(entry).display()),
            ActionSpec::Touch => "已更新时间戳".to_string(),
        };
        logger.log_file(entry.path(), entry.size(), &status)?;
    }
    summary.action = Some(action);

    Ok(summary)
}
