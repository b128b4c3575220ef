/// SQLite 日志落库 - 建表、级别表初始化、逐条写入、提交与关闭
use crate::constants::{CREATE_TABLES_SQL, INSERT_LEVEL_SQL, INSERT_LOG_SQL};
use crate::error::{Error, Result};
use crate::{database_error, file_error};
use crate::levels::LevelMap;
use log::{debug, info};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 一条待写入的日志记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// 产生日志的 logger 名称
    pub logger_name: String,
    /// 级别数值，未知级别原样写入
    pub level: i64,
    /// 源码位置
    pub pathname: String,
    pub msg: String,
}

impl LogRecord {
    pub fn new(
        logger_name: impl Into<String>,
        level: i64,
        pathname: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            logger_name: logger_name.into(),
            level,
            pathname: pathname.into(),
            msg: msg.into(),
        }
    }
}

/// SQLite 日志 sink
///
/// 连接处于自动提交模式，每次写入立即落盘。`write`/`flush`/`close`
/// 各自在调用期间持有同一把互斥锁，调用结束即释放。
/// 关闭后连接被取走，后续写入返回 [`DatabaseError::Closed`](crate::error::DatabaseError::Closed)。
#[derive(Debug)]
pub struct SqliteSink {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
    seed_diagnostic: Option<String>,
}

impl SqliteSink {
    /// 打开（或创建）数据库文件并建表
    ///
    /// `levels` 为 `None` 表示级别映射不可用：输出诊断信息后继续，LogLevels 保持为空。
    /// 只有文件无法打开或建表失败才返回错误。
    pub fn open<P: AsRef<Path>>(path: P, levels: Option<&LevelMap>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening SQLite log sink: {}", path.display());

        // 确保目录存在
        if let Some(parent) = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty() && !p.exists())
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                file_error!(CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    reason: e.to_string(),
                })
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            database_error!(OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;

        conn.execute_batch(CREATE_TABLES_SQL).map_err(|e| {
            database_error!(SchemaFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;

        let seed_diagnostic = seed_levels(&conn, levels);

        info!("SQLite log sink ready: {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(Some(conn)),
            seed_diagnostic,
        })
    }

    /// 追加一行日志，立即提交
    pub fn write(&self, record: &LogRecord) -> Result<()> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or_else(|| self.closed_error())?;

        let mut stmt = conn.prepare_cached(INSERT_LOG_SQL).map_err(insert_failed)?;
        stmt.execute(params![
            record.logger_name,
            record.level,
            record.pathname,
            record.msg
        ])
        .map_err(insert_failed)?;
        Ok(())
    }

    /// 提交未完成的事务。自动提交模式下通常为空操作
    pub fn flush(&self) -> Result<()> {
        let guard = self.lock();
        if let Some(conn) = guard.as_ref() {
            commit_pending(conn)?;
        }
        Ok(())
    }

    /// 提交并关闭连接。重复关闭为空操作
    pub fn close(&self) -> Result<()> {
        let mut guard = self.lock();
        let Some(conn) = guard.take() else {
            return Ok(());
        };

        // 提交失败也要关闭连接
        let committed = commit_pending(&conn);
        let closed = conn.close().map_err(|(_, e)| {
            database_error!(CloseFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })
        });
        drop(guard);

        committed?;
        closed?;
        debug!("SQLite log sink closed: {}", self.path.display());
        Ok(())
    }

    /// 数据库文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    /// 级别表初始化时产生的诊断信息（级别映射不可用或写入失败）
    pub fn seed_diagnostic(&self) -> Option<&str> {
        self.seed_diagnostic.as_deref()
    }

    // 写入过程中 panic 不影响连接本身，锁中毒时继续使用
    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn closed_error(&self) -> Error {
        database_error!(Closed {
            path: self.path.clone()
        })
    }
}

impl Drop for SqliteSink {
    fn drop(&mut self) {
        let conn = self
            .conn
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(conn) = conn.as_ref() {
            if let Err(e) = commit_pending(conn) {
                eprintln!(
                    "SQLite log sink final commit on Drop failed ({}): {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// 写入级别表，返回诊断信息（如有）
///
/// 失败不影响 sink 的打开，只写到 stderr：此时 sink 可能正是全局 logger，不能再走 `log` 宏
fn seed_levels(conn: &Connection, levels: Option<&LevelMap>) -> Option<String> {
    let Some(levels) = levels else {
        let msg = "Unable to get log level names, LogLevels table left empty".to_string();
        eprintln!("{msg}");
        return Some(msg);
    };

    let mut inserted = 0;
    for entry in levels.iter() {
        match conn.execute(INSERT_LEVEL_SQL, params![entry.name, entry.value]) {
            Ok(n) => inserted += n,
            Err(e) => {
                let msg = format!("Unable to seed log level '{}': {}", entry.name, e);
                eprintln!("{msg}");
                return Some(msg);
            }
        }
    }

    debug!(
        "Seeded {} of {} log levels (duplicates ignored)",
        inserted,
        levels.len()
    );
    None
}

fn commit_pending(conn: &Connection) -> Result<()> {
    if conn.is_autocommit() {
        return Ok(());
    }
    conn.execute_batch("COMMIT").map_err(|e| {
        database_error!(CommitFailed {
            reason: e.to_string()
        })
    })
}

fn insert_failed(e: rusqlite::Error) -> Error {
    database_error!(InsertFailed {
        reason: e.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatabaseError;
    use crate::levels::default_level_map;
    use tempfile::TempDir;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/log.db");

        let sink = SqliteSink::open(&path, Some(&default_level_map())).unwrap();
        assert!(path.exists());
        assert_eq!(sink.path(), path.as_path());
        assert!(sink.seed_diagnostic().is_none());
    }

    #[test]
    fn test_pending_transaction_committed_by_flush() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.db");
        let sink = SqliteSink::open(&path, None).unwrap();

        // 模拟调用方在连接上开启了事务
        sink.lock()
            .as_ref()
            .unwrap()
            .execute_batch("BEGIN")
            .unwrap();
        sink.write(&LogRecord::new("app", 20, "main.rs:1", "pending"))
            .unwrap();

        let reader = Connection::open(&path).unwrap();
        assert_eq!(count(&reader, "Logs"), 0);

        sink.flush().unwrap();
        assert_eq!(count(&reader, "Logs"), 1);
        assert!(sink.lock().as_ref().unwrap().is_autocommit());
    }

    #[test]
    fn test_close_commits_pending_transaction() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.db");
        let sink = SqliteSink::open(&path, None).unwrap();

        sink.lock()
            .as_ref()
            .unwrap()
            .execute_batch("BEGIN")
            .unwrap();
        sink.write(&LogRecord::new("app", 20, "main.rs:2", "before close"))
            .unwrap();
        sink.close().unwrap();
        assert!(sink.is_closed());

        let reader = Connection::open(&path).unwrap();
        assert_eq!(count(&reader, "Logs"), 1);
    }

    #[test]
    fn test_drop_commits_pending_transaction() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.db");
        let sink = SqliteSink::open(&path, None).unwrap();

        sink.lock()
            .as_ref()
            .unwrap()
            .execute_batch("BEGIN")
            .unwrap();
        sink.write(&LogRecord::new("app", 30, "main.rs:9", "dropped sink"))
            .unwrap();
        drop(sink);

        let reader = Connection::open(&path).unwrap();
        assert_eq!(count(&reader, "Logs"), 1);
    }

    #[test]
    fn test_close_twice_is_noop_and_flush_after_close_is_ok() {
        let dir = TempDir::new().unwrap();
        let sink = SqliteSink::open(dir.path().join("log.db"), None).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
        sink.flush().unwrap();

        let err = sink
            .write(&LogRecord::new("app", 10, "", "late"))
            .unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::Closed { .. })));
    }

    #[test]
    fn test_seed_stops_at_first_failure_with_diagnostic() {
        let conn = Connection::open_in_memory().unwrap();
        // 级别表不存在时写入失败
        let diag = seed_levels(&conn, Some(&default_level_map()));
        assert!(diag.unwrap().contains("Unable to seed log level"));
    }
}
