use chrono::Utc;
use log::Level;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const COMMANDS_LOG: &str = "commands.log";

#[derive(Debug)]
pub struct ActivityLog {
    path: PathBuf,
    guard: Mutex<()>,
}

impl ActivityLog {
    pub fn new(logs_dir: &Path) -> Self {
        Self {
            path: logs_dir.join(COMMANDS_LOG),
            guard: Mutex::new(()),
        }
    }

    pub fn info(&self, command: &str, message: &str) {
        self.append(Level::Info, command, message);
    }

    pub fn error(&self, command: &str, message: &str) {
        self.append(Level::Error, command, message);
    }

    fn append(&self, level: Level, command: &str, message: &str) {
        log::log!(level, "{command}: {message}");

        let Ok(_guard) = self.guard.lock() else {
            return;
        };
        let payload = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level.as_str().to_ascii_lowercase(),
            "command": command,
            "message": message,
        });

        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(file, "{}", payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_TEMP_LOG_DIR: AtomicUsize = AtomicUsize::new(0);

    struct TempLogDir {
        path: PathBuf,
    }

    impl TempLogDir {
        fn new() -> Self {
            let sequence = NEXT_TEMP_LOG_DIR.fetch_add(1, Ordering::Relaxed);
            let path = std::env::temp_dir().join(format!(
                "clinic-activity-log-tests-{}-{}",
                std::process::id(),
                sequence
            ));
            fs::create_dir_all(&path).expect("create temp log dir");
            Self { path }
        }
    }

    impl Drop for TempLogDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn entries_are_appended_as_json_lines() {
        let dir = TempLogDir::new();
        let log = ActivityLog::new(&dir.path);

        log.info("generate_work_schedule", "generated 4 shifts");
        log.error("approve_shifts", "unknown shift ids: x");

        let raw = fs::read_to_string(dir.path.join(COMMANDS_LOG)).expect("read log");
        let lines = raw
            .lines()
            .map(|line| serde_json::from_str::<serde_json::Value>(line).expect("json line"))
            .collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["level"], "info");
        assert_eq!(lines[0]["command"], "generate_work_schedule");
        assert_eq!(lines[1]["level"], "error");
        assert_eq!(lines[1]["message"], "unknown shift ids: x");
    }
}
