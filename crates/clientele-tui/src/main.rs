//! `clientele-tui`: interactive client manager for a Pi-hole style DNS
//! appliance.
//!
//! One screen: the clients table with its add form, comment and group
//! editors, and bulk delete. Connection settings come from the shared
//! `clientele` config file, overridable by flags.
//!
//! Logs are written to a file (default `/tmp/clientele-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use clientele_core::{ClientManager, ManagerConfig, PreferenceStore, TlsVerification};

use crate::app::App;

/// Terminal UI for managing the clients of a Pi-hole style appliance.
#[derive(Parser, Debug)]
#[command(name = "clientele-tui", version, about)]
struct Cli {
    /// Profile from the config file
    #[arg(short = 'p', long, env = "CLIENTELE_PROFILE")]
    profile: Option<String>,

    /// Appliance URL (e.g., http://pi.hole), overrides the profile
    #[arg(short = 'u', long, env = "CLIENTELE_URL")]
    url: Option<String>,

    /// Session id sent as X-FTL-SID
    #[arg(long, env = "CLIENTELE_SID", hide_env_values = true)]
    sid: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long, env = "CLIENTELE_INSECURE")]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CLIENTELE_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/clientele-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing: stdout belongs to the UI. Hold the guard for the
/// lifetime of the app so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("clientele_tui={log_level},clientele_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("clientele-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Flags > profile > defaults. Without any profile, `--url` is required.
fn manager_config(cli: &Cli) -> Result<ManagerConfig> {
    let cfg = clientele_config::load_config_or_default();
    let profile_name = cli
        .profile
        .clone()
        .unwrap_or_else(|| cfg.default_profile_name().to_owned());

    let mut config = match (cfg.profiles.get(&profile_name), cli.url.as_deref()) {
        (Some(profile), _) => {
            clientele_config::profile_to_manager_config(profile, &profile_name, &cfg.defaults)?
        }
        (None, Some(url)) => {
            let mut config = ManagerConfig::new(url.parse::<url::Url>().wrap_err("invalid appliance URL")?);
            config.timeout = Duration::from_secs(cfg.defaults.timeout);
            if cfg.defaults.insecure {
                config.tls = TlsVerification::DangerAcceptInvalid;
            }
            config
        }
        (None, None) => {
            return Err(eyre!(
                "no appliance configured: run `clientele config init` or pass --url \
                 (config file: {})",
                clientele_config::config_path().display()
            ));
        }
    };

    if let Some(ref url) = cli.url {
        config.url = url.parse::<url::Url>().wrap_err("invalid appliance URL")?;
    }
    if let Some(ref sid) = cli.sid {
        config.session_id = Some(SecretString::from(sid.clone()));
    }
    if cli.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks BEFORE entering the terminal
    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let config = manager_config(&cli)?;
    info!(url = %config.url, "starting clientele-tui");

    let manager = ClientManager::new(&config)?;
    let store = PreferenceStore::new(clientele_config::grid_state_path());
    let mut app = App::new(manager, store);
    app.run().await?;

    Ok(())
}
