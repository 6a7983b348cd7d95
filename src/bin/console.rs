//! AtlasKV Console Binary
//!
//! Connects to the store and runs the interactive console on stdin/stdout.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use atlaskv_console::config::{self, ConfigBuilder};
use atlaskv_console::console::GREETING;
use atlaskv_console::{Config, Repl, Session};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// AtlasKV Console
#[derive(Parser, Debug)]
#[command(name = "atlaskv-console")]
#[command(about = "Interactive console for AtlasKV key-value stores")]
#[command(version)]
struct Args {
    /// Store endpoints, comma separated (overrides KV_ENDPOINTS)
    #[arg(short, long)]
    endpoints: Option<String>,

    /// Username (overrides KV_USERNAME)
    #[arg(short, long)]
    username: Option<String>,

    /// Password (overrides KV_PASSWORD)
    #[arg(short, long)]
    password: Option<String>,

    /// Connect timeout per endpoint in milliseconds
    #[arg(long)]
    dial_timeout_ms: Option<u64>,

    /// Timeout for each store call in milliseconds
    #[arg(long)]
    request_timeout_ms: Option<u64>,

    /// Settings file with KEY=value lines
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout belongs to the console
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("AtlasKV Console v{}", atlaskv_console::VERSION);
    tracing::info!("Endpoints: {}", config.endpoints.join(","));

    let session = match Session::connect(config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            eprintln!("Failed to connect to store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Connected to {}", session.endpoint());
    println!("{}", GREETING);

    // The session is dropped (and closed) when the loop returns
    let mut repl = Repl::new(session);
    let result = repl.run(io::stdin().lock(), io::stdout().lock());
    drop(repl);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Console error: {}", e);
            eprintln!("Console error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then the settings file, then the environment, then flags
fn build_config(args: &Args) -> atlaskv_console::Result<Config> {
    config::load_env_file(&args.env_file)?;

    let mut builder = ConfigBuilder::from(Config::from_env()?);
    if let Some(endpoints) = &args.endpoints {
        builder = builder.endpoints(config::split_endpoints(endpoints));
    }
    if let Some(username) = &args.username {
        builder = builder.username(username.as_str());
    }
    if let Some(password) = &args.password {
        builder = builder.password(password.as_str());
    }
    if let Some(ms) = args.dial_timeout_ms {
        builder = builder.dial_timeout_ms(ms);
    }
    if let Some(ms) = args.request_timeout_ms {
        builder = builder.request_timeout_ms(ms);
    }

    let config = builder.build();
    config.validate()?;
    Ok(config)
}
