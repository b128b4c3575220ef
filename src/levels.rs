//! 日志级别与数值映射
//!
//! LogLevels 表的内容由调用方显式注入（[`LevelMap`]），
//! 不从全局注册表中反查。

use crate::config_error;
use crate::constants::LOG_LEVELS;
use crate::error::Result;
use log::{Level, LevelFilter};
use std::collections::HashMap;
use std::sync::LazyLock;

// 缓存级别字符串到 LevelFilter 的映射，避免每次查找时重新构建
static LEVEL_FILTER_MAP: LazyLock<HashMap<&'static str, LevelFilter>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("off", LevelFilter::Off);
    map.insert("trace", LevelFilter::Trace);
    map.insert("debug", LevelFilter::Debug);
    map.insert("info", LevelFilter::Info);
    map.insert("warn", LevelFilter::Warn);
    map.insert("error", LevelFilter::Error);
    map
});

/// 一个具名的严重级别及其数值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub name: String,
    pub value: i64,
}

impl LevelEntry {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// 级别名称到数值的映射，按插入顺序写入 LogLevels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelMap {
    entries: Vec<LevelEntry>,
}

impl LevelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个级别。重复项保留，交给数据库的 `INSERT OR IGNORE` 处理
    #[must_use]
    pub fn with_level(mut self, name: impl Into<String>, value: i64) -> Self {
        self.entries.push(LevelEntry::new(name, value));
        self
    }

    /// 按名称查找数值（第一个匹配项）
    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, i64)> for LevelMap {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| LevelEntry::new(name, value))
                .collect(),
        }
    }
}

/// `log` 级别对应的数值，数值越大越严重
pub fn level_value(level: Level) -> i64 {
    match level {
        Level::Trace => 5,
        Level::Debug => 10,
        Level::Info => 20,
        Level::Warn => 30,
        Level::Error => 40,
    }
}

/// `log` 门面的标准级别映射
pub fn default_level_map() -> LevelMap {
    Level::iter().fold(LevelMap::new(), |map, level| {
        map.with_level(level.as_str(), level_value(level))
    })
}

/// 解析日志级别字符串（大小写不敏感）
pub fn parse_level_filter(level_str: &str) -> Result<LevelFilter> {
    let lower = level_str.to_lowercase();
    LEVEL_FILTER_MAP
        .get(lower.as_str())
        .copied()
        .ok_or_else(|| {
            config_error!(InvalidLogLevel {
                level: level_str.to_string(),
                valid_levels: LOG_LEVELS.iter().map(|s| (*s).to_string()).collect(),
            })
        })
}
