use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};

/// Append log records to a SQLite database file
#[derive(Debug, Parser)]
#[command(
    name = "sqlitelog",
    version,
    about = "Append log records to a SQLite database file",
    long_about = "A small log sink that stores every accepted log record as a row in a SQLite database (tables LogLevels and Logs)."
)]
pub struct Cli {
    /// Enable verbose output (debug level)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Suppress non-error output (error level only)
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write one log record into the configured database
    Emit {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "config.toml")]
        config: String,
        /// Level of the record (trace, debug, info, warn, error)
        #[arg(short = 'l', long = "level", default_value = "info")]
        level: log::Level,
        /// Logger name stored in the Name column
        #[arg(short = 'n', long = "name", default_value = "sqlitelog")]
        name: String,
        /// Message text
        message: String,
    },
    /// Generate a default configuration file
    Init {
        /// Output configuration file path
        #[arg(short = 'o', long = "output", default_value = "config.toml")]
        output: String,
        /// Force overwrite if file exists
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = "config.toml")]
        config: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completions
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
    }
}
