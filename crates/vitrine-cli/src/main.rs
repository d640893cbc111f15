use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use vitrine_core::AppConfig;

/// Extract product records from store pages and print them as JSON.
#[derive(Debug, Parser)]
#[command(name = "vitrine", version, about)]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log extraction details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Product page URLs, extracted in the given order
    #[arg(required = true, value_name = "URL")]
    urls: Vec<String>,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "info,vitrine=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbose).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => AppConfig::load_with_env().context("failed to load config"),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("Starting Vitrine v{}", env!("CARGO_PKG_VERSION"));
    let config = load_config(cli.config.as_ref())?;
    debug!("Using site {}", config.site.domain);

    let batch = vitrine_scraper::extract_many(&cli.urls, &config).await;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&batch)
    } else {
        serde_json::to_string(&batch)
    }
    .context("failed to serialize batch result")?;
    println!("{json}");

    Ok(if batch.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "vitrine",
            "--pretty",
            "-c",
            "/tmp/vitrine.toml",
            "https://panini.com.br/a",
            "https://panini.com.br/b",
        ])
        .expect("parse");

        assert!(cli.pretty);
        assert!(!cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/vitrine.toml")));
        assert_eq!(cli.urls, vec!["https://panini.com.br/a", "https://panini.com.br/b"]);
    }

    #[test]
    fn test_urls_are_required() {
        assert!(Cli::try_parse_from(["vitrine", "--verbose"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/vitrine/config.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
