use crate::config::SinkConfig;
use crate::error::Result;
use crate::levels::{default_level_map, level_value, parse_level_filter};
use crate::sink::{LogRecord, SqliteSink};
use log::{LevelFilter, Log, Metadata, Record};
use std::sync::Arc;

// 本库自身的进度日志不写回它所管理的数据库
const OWN_TARGET_PREFIX: &str = concat!(env!("CARGO_PKG_NAME"), "::");

impl From<&Record<'_>> for LogRecord {
    fn from(record: &Record<'_>) -> Self {
        // 源码位置优先 file:line，其次 module_path
        let pathname = match (record.file(), record.line()) {
            (Some(file), Some(line)) => format!("{file}:{line}"),
            (Some(file), None) => file.to_string(),
            _ => record.module_path().unwrap_or_default().to_string(),
        };

        LogRecord {
            logger_name: record.target().to_string(),
            level: level_value(record.level()),
            pathname,
            msg: record.args().to_string(),
        }
    }
}

/// `log` 门面适配器：过滤级别后把记录交给 [`SqliteSink`]
///
/// 级别过滤只在这里做，sink 本身不过滤。
#[derive(Debug, Clone)]
pub struct SqliteLogger {
    sink: Arc<SqliteSink>,
    level: LevelFilter,
}

impl SqliteLogger {
    pub fn new(sink: Arc<SqliteSink>, level: LevelFilter) -> Self {
        Self { sink, level }
    }

    pub fn sink(&self) -> &Arc<SqliteSink> {
        &self.sink
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

impl Log for SqliteLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && !metadata.target().starts_with(OWN_TARGET_PREFIX)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Log::log 无法返回错误，写入失败只能报告到 stderr，记录丢弃
        if let Err(e) = self.sink.write(&LogRecord::from(record)) {
            eprintln!("Failed to write log record to SQLite: {e}");
        }
    }

    fn flush(&self) {
        if let Err(e) = self.sink.flush() {
            eprintln!("Failed to flush SQLite log sink: {e}");
        }
    }
}

/// 按配置打开 sink 并注册为全局 logger
///
/// 返回共享的 sink，宿主程序退出前应调用 [`SqliteSink::close`]。
pub fn init_logging(config: &SinkConfig) -> Result<Arc<SqliteSink>> {
    let level = parse_level_filter(config.level())?;

    let levels = config.seed_levels.then(default_level_map);
    let sink = Arc::new(SqliteSink::open(config.path(), levels.as_ref())?);
    let logger = SqliteLogger::new(Arc::clone(&sink), level);

    // 注册 logger
    log::set_max_level(level);
    log::set_boxed_logger(Box::new(logger))?;

    log::info!(
        "Logging to SQLite - level: {:?}, file: {}",
        level,
        config.path()
    );

    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use tempfile::TempDir;

    #[test]
    fn test_record_conversion_uses_file_and_line() {
        let row = LogRecord::from(
            &Record::builder()
                .args(format_args!("hello {}", 42))
                .level(Level::Warn)
                .target("app::net")
                .file(Some("src/net.rs"))
                .line(Some(17))
                .module_path(Some("app::net"))
                .build(),
        );

        assert_eq!(row.logger_name, "app::net");
        assert_eq!(row.level, 30);
        assert_eq!(row.pathname, "src/net.rs:17");
        assert_eq!(row.msg, "hello 42");
    }

    #[test]
    fn test_record_conversion_falls_back_to_module_path() {
        let row = LogRecord::from(
            &Record::builder()
                .args(format_args!("no file"))
                .level(Level::Info)
                .target("app")
                .module_path(Some("app::main"))
                .build(),
        );
        assert_eq!(row.pathname, "app::main");

        let bare = LogRecord::from(
            &Record::builder()
                .args(format_args!("nothing"))
                .level(Level::Info)
                .build(),
        );
        assert_eq!(bare.pathname, "");
    }

    #[test]
    fn test_logger_enabled_respects_threshold() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(SqliteSink::open(dir.path().join("log.db"), None).unwrap());
        let logger = SqliteLogger::new(sink, LevelFilter::Warn);

        let warn = Metadata::builder().level(Level::Warn).build();
        let error = Metadata::builder().level(Level::Error).build();
        let info = Metadata::builder().level(Level::Info).build();
        assert!(logger.enabled(&warn));
        assert!(logger.enabled(&error));
        assert!(!logger.enabled(&info));
        assert_eq!(logger.level(), LevelFilter::Warn);
    }

    #[test]
    fn test_logger_skips_own_targets() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(SqliteSink::open(dir.path().join("log.db"), None).unwrap());
        let logger = SqliteLogger::new(sink, LevelFilter::Trace);

        let own = Metadata::builder()
            .level(Level::Info)
            .target("sqlitelog::logging")
            .build();
        let closing = Metadata::builder()
            .level(Level::Debug)
            .target("sqlitelog::sink")
            .build();
        let bare_name = Metadata::builder()
            .level(Level::Info)
            .target("sqlitelog")
            .build();
        let app = Metadata::builder().level(Level::Info).target("app").build();
        assert!(!logger.enabled(&own));
        assert!(!logger.enabled(&closing));
        assert!(logger.enabled(&bare_name));
        assert!(logger.enabled(&app));
    }

    #[test]
    fn test_own_messages_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.db");
        let sink = Arc::new(SqliteSink::open(&path, None).unwrap());
        let logger = SqliteLogger::new(Arc::clone(&sink), LevelFilter::Trace);

        logger.log(
            &Record::builder()
                .args(format_args!("Logging to SQLite"))
                .level(Level::Info)
                .target("sqlitelog::logging")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .target("app")
                .build(),
        );
        logger.flush();

        let conn = rusqlite::Connection::open(&path).unwrap();
        let names: Vec<String> = conn
            .prepare("SELECT Name FROM Logs")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(names, vec!["app"]);
    }

    #[test]
    fn test_logger_off_rejects_everything() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(SqliteSink::open(dir.path().join("log.db"), None).unwrap());
        let logger = SqliteLogger::new(sink, LevelFilter::Off);

        let error = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&error));
    }
}
