use log::{debug, error, info, warn};

use sqlitelog::error::Result;
use sqlitelog::file_error;
use std::fs;
use std::path::Path;

/// 默认配置文件内容
pub const DEFAULT_CONFIG: &str = r#"# SQLite 日志落库配置文件

[sink]
# 数据库文件路径（不存在时自动创建，包括父目录）
path = "logs/sqlitelog.db"
# 写入的最低日志级别: off, trace, debug, info, warn, error
level = "info"
# 是否在 LogLevels 表中写入标准级别（TRACE=5 ... ERROR=40）
seed_levels = true
"#;

/// 生成默认配置文件
pub fn handle_init(output_path: &str, force: bool) -> Result<()> {
    let path = Path::new(output_path);

    info!("Generating configuration file: {output_path}");

    // 检查文件是否已存在
    if path.exists() && !force {
        error!("Configuration file already exists: {output_path}");
        info!("Tip: use --force to overwrite");
        return Err(file_error!(AlreadyExists {
            path: path.to_path_buf(),
        }));
    }

    if path.exists() && force {
        warn!("Overwriting existing configuration file");
    }

    // 创建目录（如果需要）
    if let Some(parent) = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty() && !p.exists())
    {
        info!("Creating directory: {}", parent.display());
        fs::create_dir_all(parent).map_err(|e| {
            file_error!(CreateDirectoryFailed {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })
        })?;
    }

    debug!("Writing configuration file...");
    fs::write(path, DEFAULT_CONFIG).map_err(|e| {
        file_error!(WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    })?;

    info!("Configuration file written: {output_path}");
    info!("Next steps:");
    info!("  1. Edit the configuration file: {output_path}");
    info!("  2. Validate it: sqlitelog validate -c {output_path}");
    info!("  3. Write a record: sqlitelog emit -c {output_path} \"hello\"");

    Ok(())
}
