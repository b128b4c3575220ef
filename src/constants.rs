//! 公共常量
//! 提供：
//! - 合法日志级别常量 LOG_LEVELS
//! - 日志库表结构与 SQL 语句

/// 合法的日志级别（统一来源）
pub const LOG_LEVELS: &[&str] = &["off", "trace", "debug", "info", "warn", "error"];

/// 建表脚本，重复执行安全。列名与列顺序是落库文件的对外格式，不可改动
pub const CREATE_TABLES_SQL: &str = "
    CREATE TABLE IF NOT EXISTS
        LogLevels (LevelName TEXT UNIQUE, Value INT UNIQUE);
    CREATE TABLE IF NOT EXISTS
        Logs (Name TEXT, Level INT, Pathname TEXT, Msg TEXT, Timestamp DATETIME DEFAULT CURRENT_TIMESTAMP);
";

/// 级别表写入，名称或数值冲突时静默跳过
pub const INSERT_LEVEL_SQL: &str = "INSERT OR IGNORE INTO LogLevels (LevelName, Value) VALUES (?1, ?2)";

/// 日志行写入，Timestamp 由数据库默认值生成
pub const INSERT_LOG_SQL: &str = "INSERT INTO Logs (Name, Level, Pathname, Msg) VALUES (?1, ?2, ?3, ?4)";

/// 默认配置文件中的数据库路径
pub const DEFAULT_DB_PATH: &str = "logs/sqlitelog.db";
