use crate::error::{AppError, AppResult};
use crate::models::LogLine;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

pub const DEFAULT_LOG_LIMIT: usize = 200;
pub const MAX_LOG_LIMIT: usize = 1000;

/// 只读取文件末尾这么多字节
const MAX_TAIL_BYTES: u64 = 1024 * 1024;

/// 读取日志文件 (最新的在前)
#[derive(Clone)]
pub struct LogService {
    path: Option<PathBuf>,
}

impl LogService {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub async fn recent(&self, limit: Option<usize>) -> AppResult<Vec<LogLine>> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);

        let tail = match read_tail(path, MAX_TAIL_BYTES).await {
            Ok(tail) => tail,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::InternalError(format!(
                    "Failed to read log file {}: {e}",
                    path.display()
                )));
            }
        };

        Ok(tail
            .lines()
            .rev()
            .filter(|line| !line.trim().is_empty())
            .take(limit)
            .map(parse_line)
            .collect())
    }
}

/// 读取文件最后 `max_bytes` 字节; 非 UTF-8 字节替换为 U+FFFD.
/// 从中间截断时丢弃第一行 (不完整).
async fn read_tail(path: &Path, max_bytes: u64) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let len = file.metadata().await?.len();
    let start = len.saturating_sub(max_bytes);
    file.seek(SeekFrom::Start(start)).await?;

    let mut buf = Vec::with_capacity((len - start) as usize);
    file.read_to_end(&mut buf).await?;
    let text = String::from_utf8_lossy(&buf);

    if start == 0 {
        return Ok(text.into_owned());
    }
    Ok(text
        .split_once('\n')
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_default())
}

fn parse_line(line: &str) -> LogLine {
    match serde_json::from_str::<serde_json::Value>(line) {
        Ok(value) if value.is_object() => {
            let field = |name: &str| value.get(name).and_then(|v| v.as_str()).map(str::to_string);
            LogLine {
                timestamp: field("timestamp"),
                level: field("level"),
                message: field("message").unwrap_or_default(),
                target: field("target"),
            }
        }
        _ => LogLine {
            timestamp: None,
            level: None,
            message: line.to_string(),
            target: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_recent_returns_newest_first() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2025-09-01T10:00:00.000+00:00","level":"info","message":"first","target":"app"}}"#
        )
        .unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2025-09-01T10:00:01.000+00:00","level":"error","message":"second","target":"app"}}"#
        )
        .unwrap();
        writeln!(file, "plain text line").unwrap();

        let service = LogService::new(Some(file.path().to_path_buf()));
        let lines = service.recent(None).await.unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].message, "plain text line");
        assert!(lines[0].level.is_none());
        assert_eq!(lines[1].message, "second");
        assert_eq!(lines[1].level.as_deref(), Some("error"));
        assert_eq!(lines[2].message, "first");

        let limited = service.recent(Some(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].message, "plain text line");
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_hide_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2025-09-01T10:00:00.000+00:00","level":"info","message":"before","target":"app"}}"#
        )
        .unwrap();
        file.write_all(b"garbage \xff\xfe bytes\n").unwrap();
        writeln!(
            file,
            r#"{{"timestamp":"2025-09-01T10:00:01.000+00:00","level":"error","message":"after","target":"app"}}"#
        )
        .unwrap();

        let service = LogService::new(Some(file.path().to_path_buf()));
        let lines = service.recent(None).await.unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].message, "after");
        assert!(lines[1].message.starts_with("garbage"));
        assert!(lines[1].message.contains('\u{FFFD}'));
        assert_eq!(lines[2].message, "before");
    }

    #[tokio::test]
    async fn test_read_tail_drops_partial_first_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first line\nsecond\nthird\n").unwrap();

        // 末尾 10 字节 "ond\nthird\n": 截断的 "ond" 被丢弃
        let tail = read_tail(file.path(), 10).await.unwrap();
        assert_eq!(tail, "third\n");

        let whole = read_tail(file.path(), MAX_TAIL_BYTES).await.unwrap();
        assert_eq!(whole, "first line\nsecond\nthird\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let service = LogService::new(Some(dir.path().join("missing.log")));
        assert!(service.recent(None).await.unwrap().is_empty());

        let unconfigured = LogService::new(None);
        assert!(unconfigured.recent(Some(10)).await.unwrap().is_empty());
    }
}
