//! `logview`: fetch and print access logs from the log backend.
//!
//! ```text
//! flags + config file + LOGVIEW_API_BASE_URL
//!     → HttpClient (request id, tracing, metrics interceptors)
//!     → Router over the `/` → Logs route table
//!     → navigate, render, print
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use clap::Parser;

use logview_client::app;
use logview_client::config::load_or_default;
use logview_client::http::middleware::{RequestId, RequestTracing, ResponseMetrics, ResponseTracing};
use logview_client::http::{HttpClient, ReqwestTransport};
use logview_client::logs::{LogFilter, DEFAULT_LIMIT};
use logview_client::observability;

#[derive(Parser)]
#[command(name = "logview", version, about = "Browse access logs served by the log backend")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "logview.toml")]
    config: PathBuf,

    /// API base URL (overrides the config file and LOGVIEW_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Route to open
    #[arg(long, default_value = "/")]
    path: String,

    /// Only entries whose client IP contains this text
    #[arg(long)]
    ip: Option<String>,

    /// Only entries whose request path contains this text
    #[arg(long = "request-path")]
    request_path: Option<String>,

    /// Only entries with this status code
    #[arg(long)]
    status: Option<u16>,

    /// Page size
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: u32,

    /// Number of entries to skip
    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Earliest entry time (RFC 3339)
    #[arg(long, value_parser = parse_time)]
    from: Option<DateTime<FixedOffset>>,

    /// Latest entry time (RFC 3339)
    #[arg(long, value_parser = parse_time)]
    to: Option<DateTime<FixedOffset>>,

    /// Print collected metrics (Prometheus text format) to stderr on exit
    #[arg(long)]
    print_metrics: bool,
}

impl Cli {
    fn filter(&self) -> LogFilter {
        LogFilter {
            ip: self.ip.clone(),
            path: self.request_path.clone(),
            status: self.status,
            limit: self.limit,
            offset: self.offset,
            from: self.from,
            to: self.to,
        }
    }
}

fn parse_time(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value).map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_missing = !cli.config.exists();
    let config = load_or_default(&cli.config, cli.base_url.clone())?;

    observability::init_logging(&config.observability);
    tracing::info!("logview v{} starting", env!("CARGO_PKG_VERSION"));
    if config_missing {
        tracing::warn!(path = %cli.config.display(), "Config file not found, using defaults");
    }
    tracing::info!(
        base_url = config.api.base_url.as_deref().unwrap_or("<unset>"),
        timeout_ms = ?config.api.timeout_ms,
        history_mode = %config.router.history_mode,
        "Configuration loaded"
    );

    let mut client = HttpClient::from_config(&config.api, ReqwestTransport::new()?);
    client.add_request_interceptor(RequestId);
    client.add_request_interceptor(RequestTracing);
    client.add_response_interceptor(ResponseTracing);

    let metrics = if config.observability.metrics_enabled {
        match observability::metrics::install_recorder() {
            Ok(handle) => {
                client.add_response_interceptor(ResponseMetrics);
                Some(handle)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install metrics recorder");
                None
            }
        }
    } else {
        None
    };
    let client = Arc::new(client);

    let mut router = app::build_router(config.router.history_mode)?;
    let target = app::navigation_target(&cli.path, &cli.filter());
    let outcome = app::show(&mut router, client, &target).await;
    router.teardown();

    if cli.print_metrics {
        match &metrics {
            Some(handle) => eprint!("{}", handle.render()),
            None => tracing::warn!("Metrics are disabled; nothing to print"),
        }
    }

    match outcome {
        Ok(text) => {
            print!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("logview: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
