mod config;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use gophish_client::api::{bootstrap, ApiClient, ClientOptions};
use gophish_client::definition::{load, Definition, Variables};
use gophish_client::models::{Campaign, Group, Page, Render, Resource, SendingProfile, Template};
use gophish_client::{TrackOptions, TrackingClient};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage Gophish resources from YAML definitions
#[derive(Parser, Debug)]
#[command(name = "gophish", version, about, long_about = None)]
struct Args {
    /// Admin console URL
    #[arg(long, global = true)]
    admin_url: Option<String>,

    /// Public phishing server URL
    #[arg(long, global = true)]
    phish_url: Option<String>,

    /// API key (otherwise taken from GOPHISH_API_KEY or the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Require valid TLS certificates
    #[arg(long, global = true)]
    verify_certs: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with a username and password and print the API key
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// Store the key in the config file
        #[arg(long)]
        save: bool,
    },
    /// Create a resource from a definition file, or update the one with the same name
    Apply {
        kind: Kind,
        file: PathBuf,
        /// Variable for {{placeholders}}, as key=value
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },
    /// List resources, optionally filtered by a name pattern
    List {
        kind: Kind,
        #[arg(long)]
        regex: Option<String>,
    },
    /// Show one resource by name
    Get { kind: Kind, name: String },
    /// Delete one resource by name
    Delete { kind: Kind, name: String },
    /// Simulate recipient activity
    Track {
        #[command(subcommand)]
        action: TrackAction,
    },
}

#[derive(Subcommand, Debug)]
enum TrackAction {
    /// Record an email open
    Open(TrackArgs),
    /// Record a link click
    Click(TrackArgs),
}

#[derive(clap::Args, Debug)]
struct TrackArgs {
    /// Recipient id
    rid: String,
    #[arg(long)]
    user_agent: Option<String>,
    /// Source address to report via X-Forwarded-For
    #[arg(long)]
    ip: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Template,
    Page,
    Smtp,
    Group,
    Campaign,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Could not open log file {}: {}", log_path.display(), e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gophish started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gophish-client").join("gophish.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gophish-client").join("gophish.log");
    }
    PathBuf::from("gophish.log")
}

/// Run `$f::<R>(args..)` for the resource type selected by `$kind`
macro_rules! for_kind {
    ($kind:expr, $f:ident($($arg:expr),*)) => {
        match $kind {
            Kind::Template => $f::<Template>($($arg),*).await,
            Kind::Page => $f::<Page>($($arg),*).await,
            Kind::Smtp => $f::<SendingProfile>($($arg),*).await,
            Kind::Group => $f::<Group>($($arg),*).await,
            Kind::Campaign => $f::<Campaign>($($arg),*).await,
        }
    };
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let mut config = Config::load();
    let mut options = ClientOptions::default();
    if args.verify_certs || config.verify_certs {
        options = options.verify_certs();
    }
    if let Some(secs) = args.timeout {
        options = options.timeout(Duration::from_secs(secs));
    }
    let admin_url = config.effective_admin_url(args.admin_url.as_deref());

    match args.command {
        Command::Login {
            username,
            password,
            save,
        } => {
            let api_key = bootstrap(&admin_url, &username, &password, &options)
                .await
                .with_context(|| format!("login to {} failed", admin_url))?;
            if save {
                config.set_api_key(&api_key)?;
                eprintln!("API key saved");
            }
            println!("{}", api_key);
        }
        Command::Track { action } => {
            let phish_url = config.effective_phish_url(args.phish_url.as_deref());
            let client = TrackingClient::new(&phish_url, &options)?;
            let (track, is_open) = match action {
                TrackAction::Open(track) => (track, true),
                TrackAction::Click(track) => (track, false),
            };
            let track_options = TrackOptions {
                user_agent: track.user_agent,
                forwarded_for: track.ip,
            };
            let status = if is_open {
                client.track_open(&track.rid, &track_options).await?
            } else {
                client.track_click(&track.rid, &track_options).await?
            };
            println!("{}", status);
        }
        command => {
            let Some(api_key) = config.effective_api_key(args.api_key.as_deref()) else {
                bail!("no API key configured: pass --api-key, set GOPHISH_API_KEY, or run `gophish login --save`");
            };
            let api = ApiClient::with_options(&admin_url, &api_key, &options)?;
            run_resource_command(&api, command).await?;
        }
    }

    Ok(())
}

async fn run_resource_command(api: &ApiClient, command: Command) -> Result<()> {
    match command {
        Command::Apply { kind, file, vars } => {
            let vars: Variables = vars.into_iter().collect();
            for_kind!(kind, apply(api, &file, &vars))
        }
        Command::List { kind, regex } => for_kind!(kind, list(api, regex.as_deref())),
        Command::Get { kind, name } => for_kind!(kind, show(api, &name)),
        Command::Delete { kind, name } => for_kind!(kind, delete(api, &name)),
        Command::Login { .. } | Command::Track { .. } => Ok(()),
    }
}

async fn apply<R>(api: &ApiClient, file: &Path, vars: &Variables) -> Result<()>
where
    R: Resource + Definition + Render,
{
    let resource = load::<R>(file, vars)?;
    let synced = api.collection::<R>().sync(&resource).await?;
    println!("{}", synced.to_pretty_json()?);
    Ok(())
}

async fn list<R: Resource>(api: &ApiClient, regex: Option<&str>) -> Result<()> {
    let collection = api.collection::<R>();
    let items = match regex {
        Some(pattern) => collection.get_by_regex(pattern).await?,
        None => collection.list().await?,
    };
    for item in items {
        println!("{}\t{}", item.id(), item.name());
    }
    Ok(())
}

async fn show<R: Resource + Render>(api: &ApiClient, name: &str) -> Result<()> {
    let item = api.collection::<R>().require_by_name(name).await?;
    println!("{}", item.to_pretty_json()?);
    Ok(())
}

async fn delete<R: Resource>(api: &ApiClient, name: &str) -> Result<()> {
    let response = api.collection::<R>().delete_by_name(name).await?;
    println!("{}", response.message);
    Ok(())
}
