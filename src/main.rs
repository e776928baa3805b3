//! Worker settings CLI.
//!
//! Shows, previews and applies changes to a server's worker settings
//! through the settings API.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use workers_config::client::HttpSettingsBackend;
use workers_config::config::{load_config, validate_config, ClientConfig, ConfigError};
use workers_config::observability::logging;
use workers_config::session::{EditSession, ServerContext, SubmitOutcome};
use workers_config::settings::inherit::effective_fields;
use workers_config::settings::literal::parse_size;
use workers_config::settings::{build_patch, FlatFields};

#[derive(Parser)]
#[command(name = "workers-config")]
#[command(about = "Inspect and update worker settings of a server", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override api.base_url.
    #[arg(short, long)]
    url: Option<String>,

    /// Override server.id.
    #[arg(short, long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the editable fields
    Show {
        /// Include values inherited from base worker sections
        #[arg(long)]
        effective: bool,
    },
    /// Print the patch that the given edits would send
    Diff {
        #[arg(value_parser = parse_assignment, required = true)]
        assignments: Vec<(String, u64)>,
    },
    /// Apply the given edits and save them
    Set {
        #[arg(value_parser = parse_assignment, required = true)]
        assignments: Vec<(String, u64)>,
    },
}

/// Parse `worker.attribute=value`, where value is a count or a size literal.
fn parse_assignment(text: &str) -> Result<(String, u64), String> {
    let (path, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got {:?}", text))?;

    let value = if value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse::<u64>().map_err(|e| e.to_string())?
    } else {
        parse_size(value).map_err(|e| e.to_string())?
    };
    Ok((path.trim().to_string(), value))
}

fn print_fields(fields: &FlatFields) {
    for (path, value) in fields {
        println!("{} = {}", path, value);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = cli.url {
        config.api.base_url = url;
    }
    if let Some(server) = cli.server {
        config.server.id = server;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability.log_level);

    let backend = HttpSettingsBackend::new(&config.api)?;
    let session = EditSession::new(backend, ServerContext::from(&config.server));
    session.load().await?;

    match cli.command {
        Commands::Show { effective } => {
            if effective {
                let baseline = session.baseline().unwrap_or_default();
                print_fields(&effective_fields(&baseline));
            } else {
                print_fields(&session.current());
            }
        }
        Commands::Diff { assignments } => {
            for (path, value) in assignments {
                session.set_field(&path, value)?;
            }
            let patch = build_patch(&session.pending_changes()?)?;
            println!("{}", serde_json::to_string_pretty(&patch.to_request_body())?);
        }
        Commands::Set { assignments } => {
            for (path, value) in assignments {
                session.set_field(&path, value)?;
            }
            match session.submit().await? {
                SubmitOutcome::NoChanges => println!("No changes to save"),
                SubmitOutcome::Saved { .. } => println!("{}", session.context().saved_message()),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("smart_proxy_worker.count=1"),
            Ok(("smart_proxy_worker.count".to_string(), 1))
        );
        assert_eq!(
            parse_assignment("event_catcher.memory_threshold=2.gigabytes"),
            Ok(("event_catcher.memory_threshold".to_string(), 2_147_483_648))
        );
        assert!(parse_assignment("smart_proxy_worker.count").is_err());
        assert!(parse_assignment("ui_worker.count=two").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["workers-config", "--server", "3", "set", "ui_worker.count=2"]).unwrap();
        assert_eq!(cli.server.as_deref(), Some("3"));
        assert!(matches!(cli.command, Commands::Set { ref assignments } if assignments.len() == 1));
    }
}
