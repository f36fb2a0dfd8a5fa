use anyhow::{bail, Context};
use arvee::config_flow::{ConfigFlow, FlowResult};
use arvee::host::Host;
use arvee::lookup::BackendSelector;
use arvee::server::{self, AppState};
use arvee::settings::Settings;
use clap::{Parser, Subcommand};
use serde_json::Map;
use std::path::PathBuf;
use std::sync::Arc;

/// Arvee: keep the host timezone right while on the move.
///
/// Examples:
///   arvee serve --port 8123
///   arvee set-timezone America/Denver
///   arvee set-geo-timezone --lat 40.0 --lon -105.0
///   arvee setup
#[derive(Parser)]
#[command(name = "arvee", version, about, long_about = None)]
struct Cli {
    /// State directory (core.json, config_entries.json). Defaults to ~/.arvee.
    #[arg(long, global = true, env = "ARVEE_HOME")]
    home: Option<PathBuf>,

    /// Maximum concurrent timezone lookups.
    #[arg(long, global = true, default_value_t = 2)]
    workers: usize,

    /// Lookup timeout in seconds (0 disables).
    #[arg(long, global = true, default_value_t = 30)]
    lookup_timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, short = 'p', default_value_t = 8123)]
        port: u16,
    },
    /// Set the timezone by IANA name (e.g. Europe/Oslo).
    SetTimezone { timezone: String },
    /// Set the timezone from coordinates.
    SetGeoTimezone {
        /// Latitude (-90 to 90).
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude (-180 to 180).
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Run the setup wizard and create a config entry.
    Setup,
    /// Show the active timezone and lookup backend.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let cli = Cli::parse();
    let settings = Settings::new(cli.home, cli.workers, cli.lookup_timeout);
    log::debug!("Using state directory {}", settings.home.display());

    let host = Host::open(&settings.home, settings.executor());
    let backend = BackendSelector::compiled().select();

    match cli.command {
        Command::Serve { host: bind, port } => {
            if !arvee::setup(&host, backend.clone()) {
                log::warn!("Lookup services are unavailable; only config and setup endpoints will work");
            }
            let state = Arc::new(AppState { host, backend });
            server::start(&bind, port, state)
                .await
                .with_context(|| format!("server on {}:{} failed", bind, port))?;
        }
        Command::SetTimezone { timezone } => {
            let component = arvee::try_setup(&host, backend)?;
            component.apply_named_timezone(&timezone).await?;
            println!("{}", timezone);
        }
        Command::SetGeoTimezone { lat, lon } => {
            let component = arvee::try_setup(&host, backend)?;
            let timezone = component.apply_timezone_for_coordinates(lat, lon).await?;
            println!("{}", timezone);
        }
        Command::Setup => {
            let flow = ConfigFlow::new(backend.as_ref(), &host.entries);
            match flow.step_user(Some(Map::new())).await {
                FlowResult::CreateEntry { title, entry_id, .. } => {
                    println!("Created entry '{}' ({})", title, entry_id);
                }
                FlowResult::Form { errors, .. } => {
                    let reason = errors.get("base").map(String::as_str).unwrap_or("unknown");
                    bail!("setup failed: {}", reason);
                }
            }
        }
        Command::Status => {
            let status = serde_json::json!({
                "time_zone": host.config.time_zone().await,
                "backend": backend.as_ref().map(|b| b.kind().to_string()),
                "entries": host.entries.entries_for(arvee::DOMAIN).await.len(),
                "version": arvee::VERSION,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
