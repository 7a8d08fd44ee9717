use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};

use super::error::PipelineError;
use super::file_entry::FileEntry;

/// 目录项的分类
enum EntryKind {
    File(FileEntry),
    Directory(PathBuf),
    Other,
}

/// 创建扫描进度条
pub fn scan_spinner() -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress
}

/// 列出目录下的文件
///
/// 每一层的文件按完整路径排序；递归时，本层所有文件排在任何子目录的文件之前，
/// 子目录按排序后的顺序依次展开。
pub fn list_files(root: &Path, recursive: bool) -> Result<Vec<FileEntry>, PipelineError> {
    list_files_with_progress(root, recursive, &ProgressBar::hidden())
}

/// 同 [`list_files`]，并在进度条上报告已扫描的目录数
pub fn list_files_with_progress(
    root: &Path,
    recursive: bool,
    progress: &ProgressBar,
) -> Result<Vec<FileEntry>, PipelineError> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    let mut scanned_dirs: u64 = 0;

    while let Some(dir) = pending.pop() {
        let mut subdirs = Vec::new();

        for kind in read_level(&dir)? {
            match kind {
                EntryKind::File(entry) => files.push(entry),
                EntryKind::Directory(path) if recursive => subdirs.push(path),
                EntryKind::Directory(_) | EntryKind::Other => {}
            }
        }

        // 逆序压栈，保证第一个子目录最先展开
        pending.extend(subdirs.into_iter().rev());

        scanned_dirs += 1;
        progress.set_message(format!("已扫描 {} 个目录，找到 {} 个文件", scanned_dirs, files.len()));
        progress.tick();
    }

    progress.finish_and_clear();
    Ok(files)
}

/// 读取单层目录，按路径排序后分类
fn read_level(dir: &Path) -> Result<Vec<EntryKind>, PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::ListDirectory {
            path: dir.to_path_buf(),
            source: ignore::Error::Io(io::Error::new(io::ErrorKind::InvalidInput, "不是目录")),
        });
    }

    let mut builder = WalkBuilder::new(dir);
    builder
        .standard_filters(false) // 包含隐藏文件，不使用任何忽略规则
        .follow_links(false)
        .max_depth(Some(1))
        .sort_by_file_path(|a, b| a.as_os_str().cmp(b.as_os_str()));

    let mut kinds = Vec::new();
    for result in builder.build() {
        let entry = result.map_err(|source| PipelineError::ListDirectory {
            path: dir.to_path_buf(),
            source,
        })?;

        // 深度 0 是目录本身
        if entry.depth() == 0 {
            continue;
        }

        kinds.push(classify(child_path(dir, entry.file_name()))?);
    }

    Ok(kinds)
}

/// 子项路径；根目录为 `.` 时不带 `./` 前缀
fn child_path(dir: &Path, name: &OsStr) -> PathBuf {
    if dir == Path::new(".") {
        PathBuf::from(name)
    } else {
        dir.join(name)
    }
}

/// 按符号链接指向的目标分类；悬空链接既不是文件也不是目录
fn classify(path: PathBuf) -> Result<EntryKind, PipelineError> {
    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(EntryKind::Other),
        Err(source) => return Err(PipelineError::Metadata { path, source }),
    };

    if metadata.is_file() {
        FileEntry::from_metadata(path, &metadata).map(EntryKind::File)
    } else if metadata.is_dir() {
        Ok(EntryKind::Directory(path))
    } else {
        Ok(EntryKind::Other)
    }
}
