//! Listener configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

/// Where to listen and how long to drain on shutdown.
///
/// Out-of-range values are rejected while parsing, so a parsed
/// `ServerConfig` is always usable.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, `0.0.0.0` for every interface.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to bind.
    #[arg(
        short = 'p',
        long,
        env = "PORT",
        default_value_t = 3000,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// Seconds in-flight requests may keep running after a shutdown signal.
    #[arg(
        long,
        env = "SHUTDOWN_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..=300)
    )]
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    /// Returns the address to bind.
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the drain window after a shutdown signal.
    pub const fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns `true` when bound to the unspecified address.
    pub const fn is_public(&self) -> bool {
        self.host.is_unspecified()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[clap(flatten)]
        server: ServerConfig,
    }

    #[test]
    fn defaults_to_loopback() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();

        assert_eq!(cli.server.socket_addr(), "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cli.server.drain_timeout(), Duration::from_secs(30));
        assert!(!cli.server.is_public());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(TestCli::try_parse_from(["test", "--port", "0"]).is_err());
        assert!(TestCli::try_parse_from(["test", "--shutdown-timeout", "0"]).is_err());
        assert!(TestCli::try_parse_from(["test", "--shutdown-timeout", "301"]).is_err());
    }

    #[test]
    fn unspecified_host_is_public() {
        let cli = TestCli::try_parse_from(["test", "--host", "0.0.0.0", "-p", "8080"]).unwrap();

        assert!(cli.server.is_public());
        assert_eq!(cli.server.socket_addr().port(), 8080);
    }
}
