use crate::config::LoggingConfig;
use chrono::Local;
use env_logger::{Env, Target};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};

/// Writes every log line to stdout and to the log file.
struct TeeWriter<W: Write> {
    stdout: io::Stdout,
    file: W,
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        self.file.flush()
    }
}

fn open_log_file(path: &str) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// JSON 行日志: {"timestamp","level","message","target"}
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let target = match &config.file {
        Some(path) => Target::Pipe(Box::new(TeeWriter {
            stdout: io::stdout(),
            file: open_log_file(path)?,
        })),
        None => Target::Stdout,
    };

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(target)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_writer_copies_to_file() {
        let mut tee = TeeWriter {
            stdout: io::stdout(),
            file: Vec::new(),
        };
        tee.write_all(b"{\"level\":\"info\"}\n").unwrap();
        tee.flush().unwrap();
        assert_eq!(tee.file, b"{\"level\":\"info\"}\n");
    }

    #[test]
    fn test_open_log_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let path = path.to_str().unwrap();

        writeln!(open_log_file(path).unwrap(), "one").unwrap();
        writeln!(open_log_file(path).unwrap(), "two").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "one\ntwo\n");
    }
}
