// File-based logging that won't interfere with terminal UI
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use lazy_static::lazy_static;

use crate::config::env;

lazy_static! {
    static ref LOG_FILE: Mutex<Option<std::fs::File>> = {
        if std::env::var(env::LOG).is_ok() {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path())
            {
                Ok(file) => Mutex::new(Some(file)),
                Err(_) => Mutex::new(None),
            }
        } else {
            Mutex::new(None)
        }
    };
}

fn log_path() -> PathBuf {
    std::env::var(env::LOG_FILE)
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("ocr-translate.log"))
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logger::write_log("DEBUG", &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write_log("WARN", &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::write_log("ERROR", &format!($($arg)*))
    };
}

pub fn write_log(level: &str, msg: &str) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            writeln!(file, "{}", format_line(level, msg)).ok();
            file.flush().ok();
        }
    }
}

fn format_line(level: &str, msg: &str) -> String {
    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
    format!("[{}] {:<5} {}", timestamp, level, msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_has_level_and_message() {
        let line = format_line("WARN", "tesseract not found");
        assert!(line.starts_with('['));
        assert!(line.contains("] WARN  tesseract not found"));
    }

    #[test]
    fn test_logging_without_file_is_silent() {
        // No log file configured in tests; must not panic
        write_log("DEBUG", "nothing to see");
    }
}
