use clap::{Parser, Subcommand};
use shortly_telemetry::LogFormat;
use std::path::PathBuf;

pub const STATE_FILE_ENV: &str = "SHORTLY_STATE_FILE";
pub const BASE_URL_ENV: &str = "SHORTLY_BASE_URL";
pub const MAX_ATTEMPTS_ENV: &str = "SHORTLY_MAX_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "SHORTLY_LOG_FORMAT";

pub const DEFAULT_STATE_FILE: &str = "shortly.json";

#[derive(Debug, Parser)]
#[command(name = "shortly", about = "Shorten URLs into short aliases and resolve them back")]
pub struct CLI {
    #[arg(long, env = STATE_FILE_ENV, default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    #[arg(long, env = BASE_URL_ENV, default_value = shortly_shortener::DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = shortly_shortener::DEFAULT_MAX_ATTEMPTS
    )]
    pub max_attempts: usize,

    /// `text` or `json`.
    #[arg(long, env = LOG_FORMAT_ENV, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL, reusing its alias if it was shortened before.
    Shorten { url: String },
    /// Print the URL behind a code or a full short URL.
    Resolve { code: String },
    /// Print every mapping.
    List,
    /// Replace the stored mappings with those in a snapshot file.
    Import { file: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        CLI::command().debug_assert();
    }

    #[test]
    fn parses_defaults() {
        let cli = CLI::try_parse_from(["shortly", "list"]).unwrap();
        assert_eq!(cli.max_attempts, 64);
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn parses_subcommand_arguments() {
        let cli = CLI::try_parse_from([
            "shortly",
            "--log-format",
            "json",
            "--max-attempts",
            "8",
            "shorten",
            "https://example.com",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.max_attempts, 8);
        assert!(matches!(cli.command, Command::Shorten { url } if url == "https://example.com"));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = CLI::try_parse_from(["shortly", "--log-format", "xml", "list"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
