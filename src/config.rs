//! Command-line configuration.

use anyhow::{Context, Result, anyhow, bail};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::crawler::service::DEFAULT_POLL_INTERVAL;
use crate::crawler::walk::DEFAULT_MAX_HOPS;
use crate::ring::types::PeerRef;
use crate::ring::udp::DEFAULT_REQUEST_TIMEOUT;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// UDP address the ring client listens on for replies.
    pub bind: SocketAddr,
    /// HTTP address for the viewer and snapshot document.
    pub http: SocketAddr,
    /// Initial anchor peer.
    pub anchor: PeerRef,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub max_hops: usize,
    /// Directory that receives `data.json` on every cycle, if any.
    pub public_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 55555)),
            http: SocketAddr::from(([127, 0, 0, 1], 8080)),
            anchor: PeerRef::new(0, "F04F1F", "127.0.0.1", 50000),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_hops: DEFAULT_MAX_HOPS,
            public_dir: None,
        }
    }
}

impl Config {
    /// Parses `--flag value` pairs; `args[0]` is the program name.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = Config::default();

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = || {
                args.get(i + 1)
                    .map(String::as_str)
                    .ok_or_else(|| anyhow!("{} requires a value", flag))
            };

            match flag {
                "--bind" => config.bind = value()?.parse().context("--bind")?,
                "--http" => config.http = value()?.parse().context("--http")?,
                "--anchor-id" => config.anchor.id = value()?.parse().context("--anchor-id")?,
                "--anchor-hash" => config.anchor.hash = value()?.to_string(),
                "--anchor-addr" => {
                    let (address, port) = split_host_port(value()?)?;
                    config.anchor.address = address;
                    config.anchor.port = port;
                }
                "--poll-ms" => {
                    config.poll_interval =
                        Duration::from_millis(value()?.parse().context("--poll-ms")?)
                }
                "--timeout-ms" => {
                    config.request_timeout =
                        Duration::from_millis(value()?.parse().context("--timeout-ms")?)
                }
                "--max-hops" => config.max_hops = value()?.parse().context("--max-hops")?,
                "--public" => config.public_dir = Some(PathBuf::from(value()?)),
                _ => {
                    tracing::warn!("Ignoring unknown argument {}", flag);
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            bail!("--poll-ms must be greater than zero");
        }
        if self.request_timeout.is_zero() {
            bail!("--timeout-ms must be greater than zero");
        }
        if self.max_hops == 0 {
            bail!("--max-hops must be greater than zero");
        }
        if self.bind.ip().is_unspecified() {
            bail!("--bind must be a concrete address; peers reply to it");
        }
        Ok(())
    }
}

/// Splits `host:port`, accepting bracketed IPv6 hosts.
fn split_host_port(raw: &str) -> Result<(String, u16)> {
    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("expected host:port, got {}", raw))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        bail!("expected host:port, got {}", raw);
    }
    let port = port.parse().with_context(|| format!("invalid port in {}", raw))?;
    Ok((host.to_string(), port))
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--bind <addr:port>] [--http <addr:port>] \
         [--anchor-id <id>] [--anchor-hash <hash>] [--anchor-addr <host:port>] \
         [--poll-ms <ms>] [--timeout-ms <ms>] [--max-hops <n>] [--public <dir>]\n\
         Example: {program} --bind 127.0.0.1:55555 --anchor-id 0 --anchor-hash F04F1F --anchor-addr 127.0.0.1:50000"
    )
}
