//! `fortigate-mcp`: MCP server exposing one FortiGate's configuration as tools.
//!
//! Settings come from flags or `FORTIGATE_*` environment variables. The
//! session is opened and checked once at startup; any problem there aborts
//! the process. Logs go to stderr because stdout carries the MCP stream.

use anyhow::{bail, Context};
use clap::builder::BoolishValueParser;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fortigate_cmdb::CmdbClient;
use fortigate_core::client::FORTIGATE_DEFAULT_TIMEOUT;
use fortigate_core::config::{Credentials, FortiGateConfig};
use fortigate_core::types::{Scheme, DEFAULT_VDOM};
use fortigate_mcp::FortiGateMcpServer;

/// MCP server for FortiGate firewall configuration.
#[derive(Parser, Debug)]
#[command(name = "fortigate-mcp", version, about)]
struct Cli {
    /// FortiGate host name or IP address
    #[arg(long, env = "FORTIGATE_HOST")]
    host: String,

    /// Administrator user name
    #[arg(short = 'u', long, env = "FORTIGATE_USERNAME")]
    username: Option<String>,

    /// Administrator password
    #[arg(long, env = "FORTIGATE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// REST API token; replaces username and password
    #[arg(long, env = "FORTIGATE_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Virtual domain
    #[arg(long, default_value = DEFAULT_VDOM, env = "FORTIGATE_VDOM")]
    vdom: String,

    /// http or https
    #[arg(long, default_value = "http", env = "FORTIGATE_SCHEME")]
    scheme: Scheme,

    /// Port (defaults to 80 for http, 443 for https)
    #[arg(long, env = "FORTIGATE_PORT", value_parser = clap::value_parser!(u16).range(1..))]
    port: Option<u16>,

    /// Verify the device's TLS certificate
    #[arg(
        long,
        env = "FORTIGATE_SSL_VERIFY",
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    ssl_verify: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = FORTIGATE_DEFAULT_TIMEOUT, env = "FORTIGATE_TIMEOUT")]
    timeout: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn credentials(&self) -> anyhow::Result<Credentials> {
        if let Some(token) = self.api_token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok(Credentials::api_token(token));
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Credentials::password(username, password)),
            _ => bail!(
                "FORTIGATE_USERNAME and FORTIGATE_PASSWORD are required unless FORTIGATE_API_TOKEN is set"
            ),
        }
    }

    fn device_config(&self) -> anyhow::Result<FortiGateConfig> {
        let mut config = FortiGateConfig::new(&self.host, self.credentials()?)?
            .with_scheme(self.scheme)
            .with_vdom(&self.vdom)
            .with_verify_ssl(self.ssl_verify)
            .with_timeout(self.timeout);
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        config.validate_config()?;
        Ok(config)
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.device_config().context("invalid FortiGate configuration")?;
    info!(
        host = %config.host,
        port = config.port(),
        scheme = %config.scheme,
        vdom = %config.vdom,
        "connecting to FortiGate"
    );

    let client = CmdbClient::connect(config)
        .await
        .context("failed to open FortiGate session")?;
    client
        .verify_surface()
        .await
        .context("FortiGate does not expose the required configuration tables")?;

    let served = FortiGateMcpServer::new(client.clone()).serve_stdio().await;

    if let Err(err) = client.logout().await {
        warn!(error = %err, "failed to close FortiGate session");
    }
    served
}
