use log::info;

use sqlitelog::config::Config;
use sqlitelog::error::Result;

/// 输出校验通过的配置
pub fn handle_validate(cfg: &Config) -> Result<()> {
    info!("Configuration validated");

    info!("Database file: {}", cfg.sink.path());
    info!("Minimum level: {}", cfg.sink.level());
    info!(
        "Seed LogLevels: {}",
        if cfg.sink.seed_levels { "yes" } else { "no" }
    );

    Ok(())
}
