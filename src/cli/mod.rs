//! Command-line interface.
//!
//! ```ignore
//! use citrate::cli::{parse_args, run_command};
//!
//! let command = parse_args(std::env::args())?;
//! run_command(command).await?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use version::{version_string, VERSION};

use std::time::Duration;

use crate::app::run_watch;
use crate::config::{ClientConfig, ServerConfig};
use crate::error::{CitrateError, CitrateResult};
use crate::logging::{init_server_logging, init_tui_logging, TUI_LOG_FILE};
use crate::sampler::SharedSampler;
use crate::server::serve;

pub const USAGE: &str = "\
Usage: citrate [COMMAND] [OPTIONS]

Commands:
  serve     Run the stats server (default)
              --addr ADDR          listen address (default 0.0.0.0:5000)
              --interval-ms MS     broadcast period (default 2000)
  watch     Live terminal dashboard
              --url URL            stream URL (default ws://127.0.0.1:5000/ws/stats)
              --no-reconnect       stay disconnected after a drop
  sample    Print one sample as JSON and exit

Options:
  -h, --help       Show this help
  -V, --version    Show version

Environment:
  CITRATE_ADDR, CITRATE_TICK_MS, CITRATE_SUBSCRIBER_BUFFER, CITRATE_WS_URL,
  CITRATE_MAX_RETRIES, CITRATE_MAX_BACKOFF_SECS, CITRATE_HISTORY_CAPACITY,
  RUST_LOG";

/// Server config from the environment with CLI overrides applied.
pub fn server_config(
    addr: Option<std::net::SocketAddr>,
    interval_ms: Option<u64>,
) -> CitrateResult<ServerConfig> {
    let mut config = ServerConfig::from_env()?;
    if let Some(addr) = addr {
        config = config.with_addr(addr);
    }
    if let Some(ms) = interval_ms {
        config = config.with_tick_interval(Duration::from_millis(ms));
    }
    config.validate()?;
    Ok(config)
}

/// Client config from the environment with CLI overrides applied.
pub fn client_config(url: Option<String>, no_reconnect: bool) -> CitrateResult<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = url {
        config = config.with_url(url);
    }
    if no_reconnect {
        config = config.without_reconnect();
    }
    config.validate()?;
    Ok(config)
}

/// Print one sample as pretty JSON.
pub fn print_sample() -> CitrateResult<()> {
    let sample = SharedSampler::default()
        .try_sample()
        .ok_or_else(|| CitrateError::Stream("sampler failed".to_string()))?;
    let json = serde_json::to_string_pretty(&sample)
        .map_err(|e| CitrateError::Stream(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Run a parsed command to completion.
pub async fn run_command(command: CliCommand) -> CitrateResult<()> {
    match command {
        CliCommand::Version => {
            println!("{}", version_string());
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Sample => print_sample(),
        CliCommand::Serve { addr, interval_ms } => {
            init_server_logging();
            serve(server_config(addr, interval_ms)?).await
        }
        CliCommand::Watch { url, no_reconnect } => {
            let config = client_config(url, no_reconnect)?;
            let _log_guard = init_tui_logging(std::path::Path::new(TUI_LOG_FILE));
            run_watch(config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_TICK_MS, ENV_WS_URL};
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cli_overrides_env() {
        std::env::set_var(ENV_TICK_MS, "900");
        let config = server_config(None, Some(250)).expect("config");
        assert_eq!(config.tick_interval, Duration::from_millis(250));

        let config = server_config(None, None).expect("config");
        assert_eq!(config.tick_interval, Duration::from_millis(900));
        std::env::remove_var(ENV_TICK_MS);
    }

    #[test]
    #[serial]
    fn test_zero_interval_rejected() {
        std::env::remove_var(ENV_TICK_MS);
        assert!(matches!(
            server_config(None, Some(0)),
            Err(CitrateError::Config { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_client_overrides() {
        std::env::set_var(ENV_WS_URL, "ws://10.1.1.1:5000/ws/stats");
        let config = client_config(Some("ws://127.0.0.1:7000/ws/stats".into()), true)
            .expect("config");
        assert_eq!(config.url, "ws://127.0.0.1:7000/ws/stats");
        assert!(!config.reconnect_enabled());
        std::env::remove_var(ENV_WS_URL);
    }

    #[test]
    fn test_usage_mentions_every_command() {
        for cmd in ["serve", "watch", "sample", "--version", "--help"] {
            assert!(USAGE.contains(cmd), "usage missing {}", cmd);
        }
    }
}
