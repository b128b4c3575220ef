mod cli;

use log::info;
use sqlitelog::config::Config;
use sqlitelog::error::{self, Result};
use std::path::Path;

/// Initialize simple console logging for init/validate commands
fn init_simple_logging(verbose: bool, quiet: bool) {
    env_logger::Builder::from_default_env()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else if quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Info
        })
        .init();
}

fn main() -> Result<()> {
    use clap::Parser;
    let cli = cli::opts::Cli::parse();

    match &cli.command {
        Some(cli::opts::Commands::Init { output, force }) => {
            init_simple_logging(cli.verbose, cli.quiet);
            cli::init::handle_init(output, *force)
        }
        Some(cli::opts::Commands::Completions { shell }) => {
            cli::opts::Cli::generate_completions(*shell);
            Ok(())
        }
        Some(cli::opts::Commands::Validate { config }) => {
            init_simple_logging(cli.verbose, cli.quiet);
            let cfg = load_config(config)?;
            cfg.validate()?;
            info!("Application started");

            cli::validate::handle_validate(&cfg)
        }
        Some(cli::opts::Commands::Emit {
            config,
            level,
            name,
            message,
        }) => {
            // emit 会把 SQLite logger 注册为全局 logger，这里不再初始化 env_logger
            let mut cfg = load_config(config)?;
            cfg.validate()?;

            if cli.verbose {
                cfg.sink.level = "debug".to_string();
            } else if cli.quiet {
                cfg.sink.level = "error".to_string();
            }

            cli::emit::handle_emit(&cfg.sink, *level, name, message)
        }
        None => {
            print_help();
            std::process::exit(1);
        }
    }
}

fn load_config(config_path: &str) -> Result<Config> {
    let path = Path::new(config_path);
    match Config::from_file(path) {
        Ok(c) => {
            eprintln!("Loaded configuration file: {config_path}");
            Ok(c)
        }
        Err(e) => {
            if let error::Error::Config(error::ConfigError::NotFound(_)) = &e {
                eprintln!(
                    "Configuration file not found: {config_path}, using default configuration"
                );
                eprintln!("Tip: run 'sqlitelog init' to generate a configuration file");
                Ok(Config::default())
            } else {
                Err(e)
            }
        }
    }
}

fn print_help() {
    eprintln!("\nsqlitelog - append log records to a SQLite database");
    eprintln!("\nUsage: sqlitelog <COMMAND> [OPTIONS]");
    eprintln!("\nCommands:");
    eprintln!("  emit         Write one log record into the database");
    eprintln!("  init         Generate a default configuration file");
    eprintln!("  validate     Validate a configuration file");
    eprintln!("  completions  Generate shell completion scripts");
    eprintln!("\nOptions:");
    eprintln!("  -v, --verbose   Enable verbose output (debug level)");
    eprintln!("  -q, --quiet     Suppress non-error output");
    eprintln!("  -h, --help      Print help information");
    eprintln!("  -V, --version   Print version information");
    eprintln!("\nExamples:");
    eprintln!("  sqlitelog init");
    eprintln!("  sqlitelog validate -c config.toml");
    eprintln!("  sqlitelog emit -c config.toml -l warn -n app \"disk nearly full\"");
    eprintln!("\nFor more help: sqlitelog --help\n");
}
