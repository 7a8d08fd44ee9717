use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
#[cfg(not(unix))]
use std::fs::FileTimes;
#[cfg(not(unix))]
use std::time::SystemTime;

use super::error::PipelineError;
use super::file_entry::FileEntry;
use super::grammar::ActionSpec;

/// 无法解码为文本时输出的标记
pub const NOT_TEXT_MARKER: &str = "NOT TEXT";

/// 复制文件追加的后缀
pub const DUPLICATE_SUFFIX: &str = ".dup";

/// 对每个文件依次执行操作
pub fn act<W: Write>(files: &[FileEntry], spec: ActionSpec, out: &mut W) -> Result<(), PipelineError> {
    for entry in files {
        match spec {
            ActionSpec::PrintFirstLine => print_first_line(entry, out)?,
            ActionSpec::Duplicate => {
                duplicate(entry)?;
            }
            ActionSpec::Touch => touch(entry)?,
        }
    }
    Ok(())
}

/// 输出文件第一行，非文本文件输出 `NOT TEXT`
pub fn print_first_line<W: Write>(entry: &FileEntry, out: &mut W) -> Result<(), PipelineError> {
    let content = entry.read_text()?;
    let line = content.first_line().unwrap_or(NOT_TEXT_MARKER);
    writeln!(out, "{}", line).map_err(PipelineError::Output)
}

/// 复制文件的目标路径：完整文件名后追加 `.dup`
pub fn duplicate_path(entry: &FileEntry) -> PathBuf {
    let mut path = OsString::from(entry.path().as_os_str());
    path.push(DUPLICATE_SUFFIX);
    PathBuf::from(path)
}

/// 逐字节复制文件，目标已存在时直接覆盖
pub fn duplicate(entry: &FileEntry) -> Result<PathBuf, PipelineError> {
    let bytes = entry.read_bytes()?;
    let target = duplicate_path(entry);
    fs::write(&target, bytes).map_err(|source| PipelineError::Write {
        path: target.clone(),
        source,
    })?;
    Ok(target)
}

/// 将访问时间和修改时间设为当前时间
pub fn touch(entry: &FileEntry) -> Result<(), PipelineError> {
    set_times_to_now(entry.path()).map_err(|source| PipelineError::Touch {
        path: entry.path().to_path_buf(),
        source,
    })
}

/// 由内核取当前时间，只需要写权限或文件所有权
#[cfg(unix)]
fn set_times_to_now(path: &Path) -> io::Result<()> {
    use nix::sys::stat::{utimensat, UtimensatFlags};
    use nix::sys::time::TimeSpec;

    utimensat(
        None,
        path,
        &TimeSpec::UTIME_NOW,
        &TimeSpec::UTIME_NOW,
        UtimensatFlags::FollowSymlink,
    )
    .map_err(io::Error::from)
}

/// 修改时间需要可写句柄（Windows 上需要 FILE_WRITE_ATTRIBUTES）
#[cfg(not(unix))]
fn set_times_to_now(path: &Path) -> io::Result<()> {
    let now = SystemTime::now();
    let file = fs::OpenOptions::new().write(true).open(path)?;
    file.set_times(FileTimes::new().set_accessed(now).set_modified(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::FileTimes;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn entry(path: &std::path::Path, content: &[u8]) -> FileEntry {
        fs::write(path, content).unwrap();
        FileEntry::from_path(path).unwrap()
    }

    #[test]
    fn test_print_first_line() {
        let temp_dir = tempdir().unwrap();
        let text = entry(&temp_dir.path().join("a.txt"), b"line one\nline two");
        let binary = entry(&temp_dir.path().join("b.bin"), &[0xc3, 0x28, 0x00]);
        let empty = entry(&temp_dir.path().join("c.txt"), b"");

        let mut out = Vec::new();
        act(&[text, binary, empty], ActionSpec::PrintFirstLine, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "line one\nNOT TEXT\n\n");
    }

    #[test]
    fn test_duplicate_appends_suffix() {
        let temp_dir = tempdir().unwrap();
        let note = entry(&temp_dir.path().join("note.txt"), b"hi");

        let mut out = Vec::new();
        act(&[note.clone()], ActionSpec::Duplicate, &mut out).unwrap();
        let dup = temp_dir.path().join("note.txt.dup");
        assert_eq!(fs::read(&dup).unwrap(), b"hi");
        assert!(out.is_empty());

        // 再次复制：覆盖 .dup，不产生 .dup.dup
        act(&[note], ActionSpec::Duplicate, &mut out).unwrap();
        assert_eq!(fs::read(&dup).unwrap(), b"hi");
        assert!(!temp_dir.path().join("note.txt.dup.dup").exists());
    }

    #[test]
    fn test_duplicate_overwrites_existing() {
        let temp_dir = tempdir().unwrap();
        let data = entry(&temp_dir.path().join("data"), &[0, 1, 2, 255]);
        fs::write(temp_dir.path().join("data.dup"), "stale content").unwrap();

        let target = duplicate(&data).unwrap();
        assert_eq!(target, temp_dir.path().join("data.dup"));
        assert_eq!(fs::read(&target).unwrap(), vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_touch_updates_timestamps() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("old.txt");
        fs::write(&path, "x").unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_times(FileTimes::new().set_accessed(past).set_modified(past)).unwrap();
        drop(file);

        let before = FileEntry::from_path(&path).unwrap();
        let mut out = Vec::new();
        act(&[before.clone()], ActionSpec::Touch, &mut out).unwrap();

        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        assert!(modified > before.modified());
        let drift = SystemTime::now().duration_since(modified).unwrap_or_default();
        assert!(drift < Duration::from_secs(5));
        assert_eq!(fs::read(&path).unwrap(), b"x");
    }

    #[cfg(unix)]
    #[test]
    fn test_touch_read_only_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("locked.txt");
        fs::write(&path, "x").unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_times(FileTimes::new().set_accessed(past).set_modified(past)).unwrap();
        drop(file);

        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        let before = FileEntry::from_path(&path).unwrap();
        touch(&before).unwrap();

        let modified = fs::metadata(&path).unwrap().modified().unwrap();
        assert!(modified > before.modified());
    }

    #[test]
    fn test_touch_missing_file_is_fatal() {
        let temp_dir = tempdir().unwrap();
        let note = entry(&temp_dir.path().join("note.txt"), b"hi");
        fs::remove_file(note.path()).unwrap();

        let err = touch(&note).unwrap_err();
        assert!(matches!(err, PipelineError::Touch { .. }));
        assert!(!note.path().exists());
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let temp_dir = tempdir().unwrap();
        let note = entry(&temp_dir.path().join("note.txt"), b"hi");
        fs::remove_file(note.path()).unwrap();

        let err = duplicate(&note).unwrap_err();
        assert!(matches!(err, PipelineError::Read { .. }));
    }
}
