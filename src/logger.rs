use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const LOG_FILE: &str = "lecture-study.log";

lazy_static::lazy_static! {
    static ref LOG_SINK: Mutex<Option<File>> = Mutex::new(None);
}

struct FileLogger;

static LOGGER: FileLogger = FileLogger;

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut sink) = LOG_SINK.lock()
            && let Some(file) = sink.as_mut()
        {
            let _ = writeln!(file, "{}", format_line(record));
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = LOG_SINK.lock()
            && let Some(file) = sink.as_mut()
        {
            let _ = file.flush();
        }
    }
}

fn format_line(record: &Record) -> String {
    format!(
        "[{}] {:<5} {}: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.target(),
        record.args()
    )
}

/// Where the log file goes: the data directory when it can be created, else the working directory.
pub fn log_path(data_dir: Option<&Path>) -> PathBuf {
    match data_dir {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => dir.join(LOG_FILE),
        _ => PathBuf::from(LOG_FILE),
    }
}

/// Route the `log` macros to `path`. Later calls only swap the file and level.
pub fn init(path: &Path, level: LevelFilter) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    if let Ok(mut sink) = LOG_SINK.lock() {
        *sink = Some(file);
    }
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    Ok(())
}
