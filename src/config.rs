use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;

use crate::{client::ClientConfig, protocol::Flavor, server::ServerConfig, state::Tab};

#[derive(Debug, Clone, Parser)]
#[command(name = "tedsuite", about = "Explore, discover and trace TED talks from the terminal")]
pub struct Config {
    /// Base URL of the content-discovery service.
    #[arg(
        long = "api-base",
        env = "TEDSUITE_API_BASE",
        value_name = "URL",
        default_value = "http://127.0.0.1:8787"
    )]
    pub api_base: String,

    #[arg(
        long,
        env = "TEDSUITE_FLAVOR",
        value_enum,
        default_value = "unified",
        help = "Endpoint layout the backend speaks"
    )]
    pub flavor: Flavor,

    /// Serve canned talks from an in-process backend and point the client at it.
    #[arg(long, env = "TEDSUITE_MOCK")]
    pub mock: bool,

    #[arg(
        long = "mock-bind",
        env = "TEDSUITE_MOCK_BIND",
        value_name = "ADDR",
        default_value = "127.0.0.1:0",
        help = "Bind address for the mock backend"
    )]
    pub mock_bind: SocketAddr,

    #[arg(
        long = "mock-delay-ms",
        env = "TEDSUITE_MOCK_DELAY_MS",
        value_name = "MS",
        default_value_t = 1_000,
        help = "Simulated latency of the mock backend"
    )]
    pub mock_delay_ms: u64,

    #[arg(
        long = "timeout-secs",
        env = "TEDSUITE_TIMEOUT_SECS",
        value_name = "SECS",
        help = "Abort backend requests after SECS seconds"
    )]
    pub timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value = "trace", help = "Tab shown at startup")]
    pub tab: Tab,

    /// Optional file path to dump raw backend responses for debugging.
    #[arg(
        long = "debug-dump",
        env = "TEDSUITE_DEBUG_DUMP",
        value_name = "FILE",
        help = "Append each backend response to FILE for offline inspection"
    )]
    pub debug_dump: Option<PathBuf>,

    #[arg(
        long = "log-file",
        env = "TEDSUITE_LOG_FILE",
        value_name = "FILE",
        help = "Write logs to FILE instead of stderr"
    )]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Client settings. `api_base` overrides the configured base, which is how
    /// the mock backend's bound address gets wired in.
    pub fn client_config(&self, api_base: Option<String>) -> ClientConfig {
        ClientConfig {
            api_base: api_base.unwrap_or_else(|| self.api_base.clone()),
            flavor: self.flavor,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.mock_bind,
            delay: Duration::from_millis(self.mock_delay_ms),
        }
    }
}
