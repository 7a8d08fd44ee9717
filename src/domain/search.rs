use super::error::PipelineError;
use super::file_entry::{FileEntry, TextContent};
use super::grammar::SearchSpec;

/// 按搜索条件过滤文件，保持原有顺序
///
/// 只有 `ContainsText` 需要读取文件内容；无法解码为文本的文件直接排除，
/// 读取本身失败时返回错误。
pub fn search(files: &[FileEntry], spec: &SearchSpec) -> Result<Vec<FileEntry>, PipelineError> {
    let mut matched = Vec::new();
    for entry in files {
        if matches(entry, spec)? {
            matched.push(entry.clone());
        }
    }
    Ok(matched)
}

/// 检查单个文件是否满足条件
pub fn matches(entry: &FileEntry, spec: &SearchSpec) -> Result<bool, PipelineError> {
    let matched = match spec {
        SearchSpec::All => true,
        SearchSpec::NameEquals(name) => entry.name() == name,
        SearchSpec::ExtensionEquals(extension) => entry.extension() == extension,
        SearchSpec::ContainsText(needle) => match entry.read_text()? {
            TextContent::Text(text) => text.contains(needle.as_str()),
            TextContent::NotText => false,
        },
        SearchSpec::SizeLessThan(size) => entry.size() < *size,
        SearchSpec::SizeGreaterThan(size) => entry.size() > *size,
    };
    Ok(matched)
}
