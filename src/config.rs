use std::ffi::OsString;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use clap::Parser;

use crate::encode::Style;
use crate::fetch::{DEFAULT_FETCH_TIMEOUT, PayloadFormat};

pub const DEFAULT_PORT: u16 = 42011;

/// Long flags also accepted with a single leading dash, e.g. `-server` or `-port=8080`.
const SINGLE_DASH_LONG_FLAGS: &[&str] = &[
    "server",
    "port",
    "bind",
    "compact",
    "raw",
    "fetch-timeout",
];

/// Reports the identity of the host, the process environment and any AWS
/// EC2/ECS metadata available to it, as JSON.
#[derive(Debug, Clone, clap::Parser)]
#[command(version, about)]
pub struct Config {
    /// Serve snapshots over HTTP instead of printing one to stdout
    #[arg(short, long)]
    pub server: bool,

    /// Port to listen on in server mode
    #[arg(short, long, env = "INTROSPECTOR_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to listen on in server mode
    #[arg(long, env = "INTROSPECTOR_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Print compact instead of indented JSON
    #[arg(short, long)]
    pub compact: bool,

    /// Embed ECS responses and the metadata file as raw strings instead of JSON
    #[arg(long)]
    pub raw: bool,

    /// Timeout in seconds for each ECS metadata request
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub fetch_timeout: u64,
}

impl Config {
    /// Parses `args` (including the binary name), exiting with usage on error.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_args(args))
    }

    /// Like [`Config::from_args`], but returns the parse error instead of exiting.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown flags or invalid values.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    pub fn payload_format(&self) -> PayloadFormat {
        if self.raw {
            PayloadFormat::Text
        } else {
            PayloadFormat::Json
        }
    }

    /// Layout of the snapshot printed in one-shot mode. Server responses are always compact.
    pub fn stdout_style(&self) -> Style {
        if self.compact {
            Style::Compact
        } else {
            Style::Pretty
        }
    }
}

/// Rewrites single-dash long flags (`-server`, `-port=8080`) to their `--` form.
///
/// Everything after a bare `--` and arguments that are not valid UTF-8 are passed through.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(flag) = arg.to_str().and_then(|arg| arg.strip_prefix('-')) else {
                return arg;
            };
            if flag == "-" {
                passthrough = true;
                return arg;
            }
            let name = flag.split_once('=').map_or(flag, |(name, _)| name);
            if SINGLE_DASH_LONG_FLAGS.contains(&name) {
                OsString::from(format!("--{flag}"))
            } else {
                arg
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["introspector"]).unwrap();

        assert!(!config.server);
        assert_eq!(config.bind, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.payload_format(), PayloadFormat::Json);
        assert_eq!(config.stdout_style(), Style::Pretty);
    }

    #[test]
    fn test_server_flags() {
        let config = Config::try_parse_from([
            "introspector",
            "-s",
            "-p",
            "8080",
            "--bind",
            "127.0.0.1",
        ])
        .unwrap();

        assert!(config.server);
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_output_flags() {
        let config = Config::try_parse_from([
            "introspector",
            "--compact",
            "--raw",
            "--fetch-timeout",
            "1",
        ])
        .unwrap();

        assert_eq!(config.stdout_style(), Style::Compact);
        assert_eq!(config.payload_format(), PayloadFormat::Text);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Config::try_parse_from(["introspector", "--port", "70000"]).is_err());
        assert!(Config::try_parse_from(["introspector", "--port", "http"]).is_err());
    }

    #[test]
    fn test_single_dash_long_flags() {
        let config = Config::try_from_args(["introspector", "-server", "-port", "8080"]).unwrap();
        assert!(config.server);
        assert_eq!(config.port, 8080);

        let config = Config::try_from_args([
            "introspector",
            "-compact",
            "-raw",
            "-bind=127.0.0.1",
            "-fetch-timeout=2",
        ])
        .unwrap();
        assert_eq!(config.stdout_style(), Style::Compact);
        assert_eq!(config.payload_format(), PayloadFormat::Text);
        assert_eq!(config.bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_normalize_args_keeps_short_flags() {
        assert_eq!(
            normalize_args(["introspector", "-s", "-p", "8080", "-c", "--server", "-x"]),
            ["introspector", "-s", "-p", "8080", "-c", "--server", "-x"]
                .map(OsString::from)
                .to_vec()
        );
        assert_eq!(
            normalize_args(["introspector", "--", "-server"]),
            ["introspector", "--", "-server"].map(OsString::from).to_vec()
        );
    }
}
