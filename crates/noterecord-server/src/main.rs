//! Note Record — categories and notes behind a validated command API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;
mod tracker;
mod validate;

use state::AppState;

const USAGE: &str = "\
noterecord - persisted categories and notes

Usage:
  noterecord                    serve the HTTP API (PORT, default 8124)
  noterecord validate [DIR]     check DIR/notes.json and exit non-zero on problems
  noterecord help               print this message

The data directory is NOTERECORD_DATA_DIR, else ../data beside the binary
when it exists, else ./data.";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Cli {
    Serve,
    Validate(Option<PathBuf>),
    Help,
}

impl Cli {
    fn parse(args: &[String]) -> Result<Self, String> {
        match args {
            [] => Ok(Self::Serve),
            [cmd, rest @ ..] => match cmd.as_str() {
                "validate" | "--validate" => match rest {
                    [] => Ok(Self::Validate(None)),
                    [dir] => Ok(Self::Validate(Some(PathBuf::from(dir)))),
                    _ => Err("validate takes at most one data directory".into()),
                },
                "help" | "--help" | "-h" => Ok(Self::Help),
                other => Err(format!("unknown command '{other}'")),
            },
        }
    }
}

/// Data directory: `NOTERECORD_DATA_DIR`, then `../data` next to the binary,
/// then `./data`.
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NOTERECORD_DATA_DIR") {
        return PathBuf::from(dir);
    }
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .map(|bin| bin.join("../data"))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match Cli::parse(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("noterecord: {msg}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    match cli {
        Cli::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Cli::Validate(dir) => {
            let report = validate::validate(&dir.unwrap_or_else(data_dir));
            validate::print_report(&report);
            std::process::exit(if report.is_valid() { 0 } else { 1 });
        }
        Cli::Serve => serve(data_dir()).await,
    }
}

async fn serve(data_dir: PathBuf) -> anyhow::Result<()> {
    info!("Data directory: {}", data_dir.display());

    let config = noterecord_core::NoteRecordConfig::from_env(&data_dir)?;
    let port = config.port;

    // Loaded once, before any command is accepted.
    let store = noterecord_store::NoteStore::open(&config.data_paths.notes_file)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;

    let state = Arc::new(AppState::new(config, Arc::new(store)));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Note Record server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_serves() {
        assert_eq!(Cli::parse(&[]), Ok(Cli::Serve));
    }

    #[test]
    fn test_validate_with_and_without_dir() {
        assert_eq!(Cli::parse(&args(&["validate"])), Ok(Cli::Validate(None)));
        assert_eq!(
            Cli::parse(&args(&["validate", "/tmp/notes"])),
            Ok(Cli::Validate(Some(PathBuf::from("/tmp/notes"))))
        );
        assert!(Cli::parse(&args(&["validate", "a", "b"])).is_err());
    }

    #[test]
    fn test_help_and_unknown() {
        assert_eq!(Cli::parse(&args(&["-h"])), Ok(Cli::Help));
        let err = Cli::parse(&args(&["serve-forever"])).unwrap_err();
        assert!(err.contains("serve-forever"));
    }
}
