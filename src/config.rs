use crate::constants::{DEFAULT_DB_PATH, LOG_LEVELS};
use crate::error::{ConfigError, Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认 true 值
fn default_true() -> bool {
    true
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sink: SinkConfig,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::Config(ConfigError::NotFound(path.to_path_buf())))?;
        Self::from_str(&content, path.to_path_buf())
    }

    /// 从字符串解析配置
    pub fn from_str(content: &str, path: PathBuf) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| {
            Error::Config(ConfigError::ParseFailed {
                path,
                reason: e.to_string(),
            })
        })?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        self.sink.validate()
    }
}

/// 日志落库配置，对应 `[sink]`
#[derive(Debug, Deserialize, Clone)]
pub struct SinkConfig {
    /// SQLite 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,
    /// 写入的最低级别（只影响 log 适配器，sink 本身不过滤）
    #[serde(default = "default_level")]
    pub level: String,
    /// 是否写入标准级别表
    #[serde(default = "default_true")]
    pub seed_levels: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            level: default_level(),
            seed_levels: true,
        }
    }
}

impl SinkConfig {
    /// 获取数据库文件路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 获取日志级别
    pub fn level(&self) -> &str {
        &self.level
    }

    /// 验证路径与日志级别
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(Error::Config(ConfigError::InvalidValue {
                field: "sink.path".to_string(),
                value: self.path.clone(),
                reason: "Database path cannot be empty".to_string(),
            }));
        }

        if !LOG_LEVELS
            .iter()
            .any(|&l| l.eq_ignore_ascii_case(self.level.as_str()))
        {
            return Err(Error::Config(ConfigError::InvalidLogLevel {
                level: self.level.clone(),
                valid_levels: LOG_LEVELS.iter().map(|s| (*s).to_string()).collect(),
            }));
        }

        Ok(())
    }
}
