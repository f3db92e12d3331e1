//! Command-line argument parsing.

use std::net::SocketAddr;

use crate::error::{CitrateError, CitrateResult};

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Run the stats server (default)
    Serve {
        addr: Option<SocketAddr>,
        interval_ms: Option<u64>,
    },
    /// Run the terminal dashboard
    Watch {
        url: Option<String>,
        no_reconnect: bool,
    },
    /// Print one sample as JSON
    Sample,
    /// Show version information
    Version,
    /// Show usage
    Help,
}

fn value_for<I>(flag: &str, args: &mut I) -> CitrateResult<String>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| CitrateError::Usage(format!("{} requires a value", flag)))
}

fn parse_serve<I>(args: &mut I) -> CitrateResult<CliCommand>
where
    I: Iterator<Item = String>,
{
    let mut addr = None;
    let mut interval_ms = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--addr" => {
                let raw = value_for("--addr", args)?;
                addr = Some(raw.parse().map_err(|e| {
                    CitrateError::Usage(format!("invalid --addr '{}': {}", raw, e))
                })?);
            }
            "--interval-ms" => {
                let raw = value_for("--interval-ms", args)?;
                interval_ms = Some(raw.parse().map_err(|e| {
                    CitrateError::Usage(format!("invalid --interval-ms '{}': {}", raw, e))
                })?);
            }
            "--help" | "-h" => return Ok(CliCommand::Help),
            other => {
                return Err(CitrateError::Usage(format!(
                    "unknown option for serve: {}",
                    other
                )))
            }
        }
    }
    Ok(CliCommand::Serve { addr, interval_ms })
}

fn parse_watch<I>(args: &mut I) -> CitrateResult<CliCommand>
where
    I: Iterator<Item = String>,
{
    let mut url = None;
    let mut no_reconnect = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--url" => url = Some(value_for("--url", args)?),
            "--no-reconnect" => no_reconnect = true,
            "--help" | "-h" => return Ok(CliCommand::Help),
            other => {
                return Err(CitrateError::Usage(format!(
                    "unknown option for watch: {}",
                    other
                )))
            }
        }
    }
    Ok(CliCommand::Watch { url, no_reconnect })
}

/// Parse command-line arguments (program name first).
///
/// # Examples
///
/// ```
/// use citrate::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["citrate".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap(), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CitrateResult<CliCommand>
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1);
    let Some(first) = args.next() else {
        return Ok(CliCommand::Serve {
            addr: None,
            interval_ms: None,
        });
    };

    match first.as_str() {
        "serve" => parse_serve(&mut args),
        "watch" => parse_watch(&mut args),
        "sample" => Ok(CliCommand::Sample),
        "--version" | "-V" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        other => Err(CitrateError::Usage(format!("unknown command: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CitrateResult<CliCommand> {
        let mut all = vec!["citrate".to_string()];
        all.extend(args.iter().map(|s| s.to_string()));
        parse_args(all.into_iter())
    }

    #[test]
    fn test_parse_no_args_serves() {
        assert_eq!(
            parse(&[]).unwrap(),
            CliCommand::Serve {
                addr: None,
                interval_ms: None
            }
        );
    }

    #[test]
    fn test_parse_version_flags() {
        assert_eq!(parse(&["--version"]).unwrap(), CliCommand::Version);
        assert_eq!(parse(&["-V"]).unwrap(), CliCommand::Version);
    }

    #[test]
    fn test_parse_help_flags() {
        assert_eq!(parse(&["--help"]).unwrap(), CliCommand::Help);
        assert_eq!(parse(&["-h"]).unwrap(), CliCommand::Help);
        assert_eq!(parse(&["watch", "-h"]).unwrap(), CliCommand::Help);
    }

    #[test]
    fn test_parse_serve_options() {
        assert_eq!(
            parse(&["serve", "--addr", "127.0.0.1:8080", "--interval-ms", "500"]).unwrap(),
            CliCommand::Serve {
                addr: Some("127.0.0.1:8080".parse().unwrap()),
                interval_ms: Some(500)
            }
        );
    }

    #[test]
    fn test_parse_watch_options() {
        assert_eq!(
            parse(&["watch", "--url", "ws://10.0.0.1:5000/ws/stats", "--no-reconnect"]).unwrap(),
            CliCommand::Watch {
                url: Some("ws://10.0.0.1:5000/ws/stats".to_string()),
                no_reconnect: true
            }
        );
        assert_eq!(
            parse(&["watch"]).unwrap(),
            CliCommand::Watch {
                url: None,
                no_reconnect: false
            }
        );
    }

    #[test]
    fn test_parse_sample() {
        assert_eq!(parse(&["sample"]).unwrap(), CliCommand::Sample);
    }

    #[test]
    fn test_missing_value_is_usage_error() {
        let err = parse(&["serve", "--addr"]).unwrap_err();
        assert!(matches!(err, CitrateError::Usage(_)));
        assert!(err.to_string().contains("--addr requires a value"));
    }

    #[test]
    fn test_bad_values_are_usage_errors() {
        assert!(matches!(
            parse(&["serve", "--addr", "nowhere"]),
            Err(CitrateError::Usage(_))
        ));
        assert!(matches!(
            parse(&["serve", "--interval-ms", "fast"]),
            Err(CitrateError::Usage(_))
        ));
    }

    #[test]
    fn test_unknown_command_and_option() {
        assert!(matches!(parse(&["deploy"]), Err(CitrateError::Usage(_))));
        assert!(matches!(
            parse(&["watch", "--verbose"]),
            Err(CitrateError::Usage(_))
        ));
    }
}
