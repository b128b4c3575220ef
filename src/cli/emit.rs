use sqlitelog::config::SinkConfig;
use sqlitelog::error::Result;
use sqlitelog::logging;

/// 把一条日志经由 log 门面写入数据库
///
/// 低于配置级别的记录会被适配器过滤，不报错。
pub fn handle_emit(cfg: &SinkConfig, level: log::Level, name: &str, message: &str) -> Result<()> {
    let sink = logging::init_logging(cfg)?;

    log::log!(target: name, level, "{message}");
    log::logger().flush();

    sink.close()?;
    eprintln!("Record written to {}", cfg.path());
    Ok(())
}
