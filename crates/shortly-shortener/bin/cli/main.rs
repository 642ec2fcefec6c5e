mod cli;

use crate::cli::{Command, CLI};
use anyhow::Context;
use clap::Parser;
use shortly_core::StoreError;
use shortly_generator::RandomGenerator;
use shortly_shortener::{ServiceSettings, ShortenerService, StoreSettings};
use shortly_storage::FileStorage;
use shortly_telemetry::TelemetryConfig;
use tracing::info;

/// URLs longer than this are shortened for `list` output.
const LIST_URL_WIDTH: usize = 50;

type Service = ShortenerService<FileStorage, RandomGenerator>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    shortly_telemetry::init(
        &TelemetryConfig::builder()
            .format(config.log_format)
            .build(),
    )?;

    info!(
        state_file = %config.state_file.display(),
        base_url = %config.base_url,
        max_attempts = config.max_attempts,
        log_format = %config.log_format,
        "starting shortly"
    );

    let settings = ServiceSettings::builder()
        .base_url(config.base_url)
        .store(
            StoreSettings::builder()
                .max_attempts(config.max_attempts)
                .build(),
        )
        .build();

    let service = ShortenerService::open(
        FileStorage::new(&config.state_file),
        RandomGenerator::new(),
        settings,
    )
    .await
    .with_context(|| format!("failed to open {}", config.state_file.display()))?;

    run(&service, config.command).await
}

async fn run(service: &Service, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Shorten { url } => {
            let shortened = service.shorten(&url)?;
            if shortened.is_new {
                service.flush().await?;
                println!("URL shortened successfully!");
            } else {
                println!("URL already shortened!");
            }
            println!("{}", service.short_url(&shortened.alias));
        }
        Command::Resolve { code } => match service.resolve_short_url(&code) {
            Ok(url) => println!("{url}"),
            Err(StoreError::NotFound(_)) => anyhow::bail!("not found: {code}"),
            Err(err) => return Err(err.into()),
        },
        Command::List => {
            for mapping in service.store().mappings() {
                println!(
                    "{}  {}",
                    service.short_url(&mapping.alias),
                    format_url(&mapping.url)
                );
            }
        }
        Command::Import { file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            service.store().restore(&bytes)?;
            service.flush().await?;
            println!("imported {} mappings", service.store().len());
        }
    }

    Ok(())
}

/// Truncates `url` for display, keeping it within [`LIST_URL_WIDTH`] characters.
fn format_url(url: &str) -> String {
    if url.chars().count() <= LIST_URL_WIDTH {
        return url.to_string();
    }
    let head: String = url.chars().take(LIST_URL_WIDTH - 3).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_urls_are_printed_as_is() {
        assert_eq!(format_url("https://example.com"), "https://example.com");

        let exact = format!("https://example.com/{}", "a".repeat(30));
        assert_eq!(exact.len(), 50);
        assert_eq!(format_url(&exact), exact);
    }

    #[test]
    fn long_urls_are_truncated_to_fifty_chars() {
        let long = format!("https://example.com/{}", "a".repeat(100));
        let formatted = format_url(&long);

        assert_eq!(formatted.chars().count(), 50);
        assert!(formatted.ends_with("..."));
        assert!(long.starts_with(formatted.trim_end_matches("...")));
    }
}
