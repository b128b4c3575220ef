//! 将 `log` 门面的日志记录逐条写入 SQLite 数据库文件
//!
//! - [`sink::SqliteSink`]：建表、写级别表、写入、提交、关闭
//! - [`logging::SqliteLogger`]：`log::Log` 适配器，负责级别过滤
pub mod config;
pub mod constants;
pub mod error;
pub mod levels;
pub mod logging;
pub mod sink;

pub use levels::{LevelEntry, LevelMap, default_level_map};
pub use logging::{SqliteLogger, init_logging};
pub use sink::{LogRecord, SqliteSink};
