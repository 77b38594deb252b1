//! Serve command - run the measurement HTTP endpoint.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;

use super::{ExitCode, MeasureOptions};
use crate::backend::{self, Mode};
use crate::config::AppConfig;
use crate::server;

/// Hardcoded defaults for values not set by CLI or config.
mod defaults {
    pub const BIND: &str = "127.0.0.1:5000";
    pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
}

/// Arguments for the HTTP service.
#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// Maximum request body size in bytes
    #[arg(long, value_name = "BYTES", value_parser = super::parse_count)]
    pub max_body_bytes: Option<usize>,

    #[command(flatten)]
    pub measure: MeasureOptions,
}

impl ServeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.bind.is_none() {
            args.bind = config.server.bind.as_deref().and_then(|b| b.parse().ok());
        }
        args.max_body_bytes = args.max_body_bytes.or(config.server.max_body_bytes);
        args.measure = args.measure.with_config(config);
        args
    }

    fn bind(&self) -> Result<SocketAddr> {
        match self.bind {
            Some(addr) => Ok(addr),
            None => defaults::BIND.parse().context("Invalid default bind address"),
        }
    }

    fn max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(defaults::MAX_BODY_BYTES)
    }
}

/// Run the serve command until interrupted.
pub fn run(args: ServeArgs, config: &AppConfig) -> Result<ExitCode> {
    let args = ServeArgs::with_config(args, config);
    let addr = args.bind()?;

    let measurer = backend::measurer(
        Mode::SingleShot,
        &args.measure.cascades(config),
        args.measure.measure_config(),
    )?;
    let app = server::router(measurer, args.max_body_bytes());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        server::serve(listener, app).await
    })?;

    Ok(ExitCode::Success)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn empty() -> ServeArgs {
        ServeArgs {
            bind: None,
            max_body_bytes: None,
            measure: MeasureOptions::default(),
        }
    }

    #[test]
    fn test_defaults() {
        let args = ServeArgs::with_config(empty(), &AppConfig::default());
        assert_eq!(args.bind().unwrap(), "127.0.0.1:5000".parse().unwrap());
        assert_eq!(args.max_body_bytes(), 16 * 1024 * 1024);
    }

    #[test]
    fn test_config_and_cli_precedence() {
        let config: AppConfig = toml::from_str(
            r"
[server]
bind = '0.0.0.0:8080'
max_body_bytes = 1024
",
        )
        .unwrap();

        let args = ServeArgs::with_config(empty(), &config);
        assert_eq!(args.bind().unwrap(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(args.max_body_bytes(), 1024);

        let cli = ServeArgs {
            bind: Some("127.0.0.1:9999".parse().unwrap()),
            ..empty()
        };
        let args = ServeArgs::with_config(cli, &config);
        assert_eq!(args.bind().unwrap(), "127.0.0.1:9999".parse().unwrap());
    }
}
