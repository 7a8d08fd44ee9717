use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use super::error::InputFormatError;

/// 搜索根目录及是否递归
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoot {
    pub path: PathBuf,
    pub recursive: bool,
}

impl FromStr for SearchRoot {
    type Err = InputFormatError;

    /// 解析 `D <路径>` 或 `R <路径>`，路径必须存在（文件或目录均可）
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.chars().count() < 3 {
            return Err(InputFormatError::TooShort(input.to_string()));
        }

        let (recursive, rest) = if let Some(rest) = input.strip_prefix("D ") {
            (false, rest)
        } else if let Some(rest) = input.strip_prefix("R ") {
            (true, rest)
        } else {
            return Err(InputFormatError::UnknownPrefix(input.to_string()));
        };

        let path = normalize_path(rest);
        if !path.exists() {
            return Err(InputFormatError::PathNotFound(path));
        }

        Ok(SearchRoot { path, recursive })
    }
}

/// 规范化路径：合并重复分隔符，去掉末尾分隔符和多余的 `.`
///
/// 只剩 `.` 时保留为 `.`；`..` 原样保留。
pub fn normalize_path(raw: &str) -> PathBuf {
    let normalized: PathBuf = Path::new(raw)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// 搜索条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSpec {
    /// 所有文件
    All,
    /// 文件名（含扩展名）完全相同
    NameEquals(String),
    /// 扩展名相同，值总是以 `.` 开头
    ExtensionEquals(String),
    /// 文本内容包含指定字符串
    ContainsText(String),
    /// 文件大小严格小于
    SizeLessThan(u64),
    /// 文件大小严格大于
    SizeGreaterThan(u64),
}

impl SearchSpec {
    /// 创建扩展名条件，缺少前导 `.` 时自动补上
    pub fn extension(value: &str) -> Self {
        if value.starts_with('.') {
            SearchSpec::ExtensionEquals(value.to_string())
        } else {
            SearchSpec::ExtensionEquals(format!(".{}", value))
        }
    }

    /// 单字符条件代码
    pub fn code(&self) -> char {
        match self {
            SearchSpec::All => 'A',
            SearchSpec::NameEquals(_) => 'N',
            SearchSpec::ExtensionEquals(_) => 'E',
            SearchSpec::ContainsText(_) => 'T',
            SearchSpec::SizeLessThan(_) => '<',
            SearchSpec::SizeGreaterThan(_) => '>',
        }
    }
}

impl FromStr for SearchSpec {
    type Err = InputFormatError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input == "A" {
            return Ok(SearchSpec::All);
        }

        let (code, value) = split_criterion(input)?;
        match code {
            'N' => Ok(SearchSpec::NameEquals(value.to_string())),
            'E' => Ok(SearchSpec::extension(value)),
            'T' => Ok(SearchSpec::ContainsText(value.to_string())),
            '<' => Ok(SearchSpec::SizeLessThan(parse_size(value)?)),
            '>' => Ok(SearchSpec::SizeGreaterThan(parse_size(value)?)),
            _ => Err(InputFormatError::UnknownPrefix(input.to_string())),
        }
    }
}

impl fmt::Display for SearchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSpec::All => write!(f, "A"),
            SearchSpec::NameEquals(value)
            | SearchSpec::ExtensionEquals(value)
            | SearchSpec::ContainsText(value) => write!(f, "{} {}", self.code(), value),
            SearchSpec::SizeLessThan(size) | SearchSpec::SizeGreaterThan(size) => {
                write!(f, "{} {}", self.code(), size)
            }
        }
    }
}

/// 拆分为条件代码和值
fn split_criterion(input: &str) -> Result<(char, &str), InputFormatError> {
    const CODES: [char; 5] = ['N', 'E', 'T', '<', '>'];

    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(code), Some(' ')) if CODES.contains(&code) => Ok((code, &input[2..])),
        _ => Err(InputFormatError::UnknownPrefix(input.to_string())),
    }
}

/// 解析十进制大小值，超出 u64 范围时取最大值
fn parse_size(value: &str) -> Result<u64, InputFormatError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputFormatError::InvalidSize(value.to_string()));
    }

    Ok(value.parse::<u64>().unwrap_or(u64::MAX))
}

/// 对匹配文件执行的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSpec {
    /// 输出第一行文本
    PrintFirstLine,
    /// 复制为 `.dup` 文件
    Duplicate,
    /// 更新访问和修改时间
    Touch,
}

impl FromStr for ActionSpec {
    type Err = InputFormatError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "F" => Ok(ActionSpec::PrintFirstLine),
            "D" => Ok(ActionSpec::Duplicate),
            "T" => Ok(ActionSpec::Touch),
            _ => Err(InputFormatError::UnknownAction(input.to_string())),
        }
    }
}

impl fmt::Display for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionSpec::PrintFirstLine => "输出首行",
            ActionSpec::Duplicate => "复制",
            ActionSpec::Touch => "更新时间戳",
        };
        f.write_str(name)
    }
}

pub fn validate_first_input(input: &str) -> bool {
    input.parse::<SearchRoot>().is_ok()
}

pub fn validate_second_input(input: &str) -> bool {
    input.parse::<SearchSpec>().is_ok()
}

pub fn validate_third_input(input: &str) -> bool {
    input.parse::<ActionSpec>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_first_input_rejects_short_or_unprefixed() {
        for input in ["", "D", "D ", "R ", "X /", "d /tmp", "D\t/", "DR /"] {
            assert!(!validate_first_input(input), "应拒绝: {:?}", input);
        }
    }

    #[test]
    fn test_first_input_checks_existence() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().display().to_string();
        let missing = temp_dir.path().join("missing").display().to_string();

        assert!(validate_first_input(&format!("D {}", dir)));
        assert!(!validate_first_input(&format!("D {}", missing)));
        assert_eq!(
            format!("R {}", missing).parse::<SearchRoot>(),
            Err(InputFormatError::PathNotFound(PathBuf::from(&missing)))
        );
    }

    #[test]
    fn test_first_input_recursion_flag() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().display().to_string();

        let root: SearchRoot = format!("D {}", dir).parse().unwrap();
        assert!(!root.recursive);
        assert_eq!(root.path, temp_dir.path());

        let root: SearchRoot = format!("R {}", dir).parse().unwrap();
        assert!(root.recursive);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("."), PathBuf::from("."));
        assert_eq!(normalize_path("./."), PathBuf::from("."));
        assert_eq!(normalize_path("x//"), PathBuf::from("x"));
        assert_eq!(normalize_path("./x/"), PathBuf::from("x"));
        assert_eq!(normalize_path("a/./b//c"), PathBuf::from("a/b/c"));
        assert_eq!(normalize_path("../x"), PathBuf::from("../x"));
        assert_eq!(normalize_path("/tmp//x/."), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_first_input_stores_normalized_root() {
        let temp_dir = tempdir().unwrap();
        let dir = temp_dir.path().display().to_string();

        let root: SearchRoot = format!("R {}//./", dir).parse().unwrap();
        assert_eq!(root.path.as_os_str(), temp_dir.path().as_os_str());

        let root: SearchRoot = "D .".parse().unwrap();
        assert_eq!(root.path, PathBuf::from("."));
    }

    #[test]
    fn test_first_input_accepts_file_path() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(validate_first_input(&format!("D {}", file.display())));
    }

    #[test]
    fn test_second_input_variants() {
        assert_eq!("A".parse::<SearchSpec>(), Ok(SearchSpec::All));
        assert_eq!("N a.txt".parse::<SearchSpec>(), Ok(SearchSpec::NameEquals("a.txt".into())));
        assert_eq!("T hello world".parse::<SearchSpec>(), Ok(SearchSpec::ContainsText("hello world".into())));
        assert_eq!("T ".parse::<SearchSpec>(), Ok(SearchSpec::ContainsText(String::new())));
        assert_eq!("< 100".parse::<SearchSpec>(), Ok(SearchSpec::SizeLessThan(100)));
        assert_eq!("> 0".parse::<SearchSpec>(), Ok(SearchSpec::SizeGreaterThan(0)));
    }

    #[test]
    fn test_second_input_rejections() {
        for input in ["", "A ", "a", "N", "X foo", "< ", "< 1a", "> -5", "> 1.5", "<100", "< ²"] {
            assert!(!validate_second_input(input), "应拒绝: {:?}", input);
        }
    }

    #[test]
    fn test_extension_normalized() {
        assert_eq!("E txt".parse::<SearchSpec>(), Ok(SearchSpec::ExtensionEquals(".txt".into())));
        assert_eq!("E .txt".parse::<SearchSpec>(), Ok(SearchSpec::ExtensionEquals(".txt".into())));
        assert_eq!("E ".parse::<SearchSpec>(), Ok(SearchSpec::ExtensionEquals(".".into())));
    }

    #[test]
    fn test_huge_size_saturates() {
        let spec: SearchSpec = "> 99999999999999999999999".parse().unwrap();
        assert_eq!(spec, SearchSpec::SizeGreaterThan(u64::MAX));
    }

    #[test]
    fn test_third_input() {
        assert_eq!("F".parse::<ActionSpec>(), Ok(ActionSpec::PrintFirstLine));
        assert_eq!("D".parse::<ActionSpec>(), Ok(ActionSpec::Duplicate));
        assert_eq!("T".parse::<ActionSpec>(), Ok(ActionSpec::Touch));
        for input in ["", "f", "F ", "FD", "A"] {
            assert!(!validate_third_input(input), "应拒绝: {:?}", input);
        }
    }

    #[test]
    fn test_spec_display() {
        assert_eq!(SearchSpec::extension("rs").to_string(), "E .rs");
        assert_eq!(SearchSpec::SizeLessThan(10).to_string(), "< 10");
        assert_eq!(SearchSpec::All.to_string(), "A");
    }
}
