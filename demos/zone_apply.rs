// # zone_apply - commit the staged changes of a zone
//
// Thin command-line wrapper around the SDK: it applies the pending record
// changes of one zone, waits for the resulting job and prints the zone.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `DPF_TOKEN`: API token (required)
// - `DPF_ZONE_ID`: Zone whose changes are applied (required)
// - `DPF_APPLY_DESCRIPTION`: Description recorded in the zone history
// - `DPF_ENDPOINT`: API base URL
// - `DPF_TIMEOUT_SECS`: Per-request timeout
// - `DPF_WATCH_INTERVAL_SECS`: Delay between job polls
// - `DPF_WATCH_TIMEOUT_SECS`: Give up waiting for the job after this long
// - `DPF_LOG_LEVEL`: trace, debug, info, warn or error
//
// ## Example
//
// ```bash
// export DPF_TOKEN=...
// export DPF_ZONE_ID=m1
// export DPF_APPLY_DESCRIPTION="add www"
//
// zone_apply
// ```

use anyhow::{Context as _, Result};
use dpf_core::projection::Fields;
use dpf_core::{Client, ClientConfig, Context, Error, path_args};
use dpf_resources::{Zone, ZoneApply};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum ApplyExitCode {
    /// Changes applied
    Applied = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The API rejected the request or the job failed
    RuntimeError = 2,
    /// Interrupted or timed out while waiting for the job
    Interrupted = 3,
}

impl From<ApplyExitCode> for ExitCode {
    fn from(code: ApplyExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    client: ClientConfig,
    zone_id: String,
    description: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let mut client = ClientConfig::new(env::var("DPF_TOKEN").context("DPF_TOKEN is required")?);
        if let Ok(endpoint) = env::var("DPF_ENDPOINT") {
            client.endpoint = endpoint;
        }
        if let Some(secs) = parse_secs("DPF_TIMEOUT_SECS")? {
            client.timeout_secs = secs;
        }
        if let Some(secs) = parse_secs("DPF_WATCH_INTERVAL_SECS")? {
            client.watch.interval_secs = secs;
        }
        if let Some(secs) = parse_secs("DPF_WATCH_TIMEOUT_SECS")? {
            client.watch.timeout_secs = secs;
        }

        Ok(Self {
            client,
            zone_id: env::var("DPF_ZONE_ID").context("DPF_ZONE_ID is required")?,
            description: env::var("DPF_APPLY_DESCRIPTION").unwrap_or_default(),
            log_level: env::var("DPF_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.client.validate()?;
        if self.zone_id.trim().is_empty() {
            anyhow::bail!("DPF_ZONE_ID cannot be empty");
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => anyhow::bail!(
                "DPF_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn parse_secs(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a number of seconds, got '{value}'")),
        Err(_) => Ok(None),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ApplyExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {e:#}");
        return ApplyExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return ApplyExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return ApplyExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config).await {
            Ok(()) => ApplyExitCode::Applied,
            Err(e) => {
                error!("{e:#}");
                match e.downcast_ref::<Error>() {
                    Some(err) if err.is_context_error() => ApplyExitCode::Interrupted,
                    _ => ApplyExitCode::RuntimeError,
                }
            }
        }
    })
    .into()
}

async fn run(config: Config) -> Result<()> {
    let client = Client::from_config(&config.client)?;
    info!(endpoint = client.endpoint(), zone_id = %config.zone_id, "applying zone changes");

    let mut apply = ZoneApply {
        description: config.description,
        ..Default::default()
    };
    apply.bind_params(&path_args![config.zone_id.as_str()])?;
    let request_id = client.apply(&apply, None).await?;
    info!(request_id = %request_id, "changes accepted");

    let ctx = Context::with_timeout(config.client.watch.timeout());
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received SIGINT, abandoning the watch");
            interrupt.cancel();
        }
    });

    let job = client
        .watch_job(&ctx, config.client.watch.interval(), &request_id)
        .await?;
    info!(request_id = %job.request_id, status = job.status.as_str(), "job finished");

    let mut zone = Zone::default();
    zone.bind_params(&path_args![config.zone_id.as_str()])?;
    client.read(&mut zone).await?;
    println!("{zone:#?}");
    Ok(())
}
