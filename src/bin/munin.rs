//! munin: command-line client
//!
//! Issues requests through a [`RequestGateway`](munin::RequestGateway) and
//! prints the response data as JSON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use munin::api::ENDPOINTS;
use munin::config::Config;
use munin::{Endpoint, Method, MuninError, Request};
use serde_json::Value;

/// Munin command-line client
#[derive(Parser)]
#[command(name = "munin")]
#[command(version = munin::PKG_VERSION)]
#[command(about = "Caching, coalescing HTTP request gateway")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Credential token sent with every request.
    #[arg(long, env = "MUNIN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// GET a path
    Get(RawRequest),
    /// POST to a path
    Post(RawRequest),
    /// PUT to a path
    Put(RawRequest),
    /// DELETE a path
    Delete(RawRequest),

    /// Call a named endpoint
    Call {
        /// Endpoint name (see `munin endpoints`)
        name: String,
        /// JSON payload
        #[arg(short, long, default_value = "{}")]
        data: String,
    },

    /// List known endpoints
    Endpoints,
}

#[derive(clap::Args)]
struct RawRequest {
    /// Path relative to the base URL, e.g. `/user/getBanner`
    path: String,
    /// JSON payload
    #[arg(short, long, default_value = "{}")]
    data: String,
    /// Bypass the response cache
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let request = match args.command {
        Command::Endpoints => {
            for endpoint in ENDPOINTS {
                println!(
                    "{:<12} {:<7} {}",
                    endpoint.name, endpoint.method, endpoint.path
                );
            }
            return Ok(());
        }
        Command::Get(raw) => raw.into_request(Method::Get)?,
        Command::Post(raw) => raw.into_request(Method::Post)?,
        Command::Put(raw) => raw.into_request(Method::Put)?,
        Command::Delete(raw) => raw.into_request(Method::Delete)?,
        Command::Call { name, data } => {
            let endpoint = Endpoint::by_name(&name).ok_or_else(|| {
                MuninError::InvalidInput(format!("unknown endpoint: {name}"))
            })?;
            endpoint.request(parse_payload(&data)?)
        }
    };

    let config = Config::load(args.config.as_deref())?;
    let mut builder = config.builder();
    if let Some(url) = args.base_url {
        builder = builder.base_url(url);
    }
    if let Some(token) = args.token {
        builder = builder.token(token);
    }
    let gateway = builder.build()?;

    match gateway.issue(request).await {
        Ok(data) => {
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(())
        }
        Err(e) => {
            if let Some(body) = e.body() {
                eprintln!("{}", serde_json::to_string_pretty(body)?);
            }
            Err(e.into())
        }
    }
}

impl RawRequest {
    fn into_request(self, method: Method) -> munin::Result<Request> {
        let mut request = Request::new(method, self.path).payload(parse_payload(&self.data)?);
        if self.no_cache {
            request = request.use_cache(false);
        }
        Ok(request)
    }
}

fn parse_payload(data: &str) -> munin::Result<Value> {
    serde_json::from_str(data)
        .map_err(|e| MuninError::InvalidInput(format!("payload is not valid JSON: {e}")))
}
