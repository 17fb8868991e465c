//! tokenguard demo - check a JWT against a service binding
//!
//! ```text
//! tokenguard-demo --config credentials.json --service xsuaa eyJhbGciOi...
//! echo "$TOKEN" | tokenguard-demo --client-id sb-orders!t42 -
//! ```
//!
//! Prints `valid` or `invalid: <reason>` on stdout; logs go to stderr.
//! Exit codes: 0 valid, 2 invalid, 1 usage or configuration error.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use tokenguard::config::{
    DEFAULT_ENV_PREFIX, OAuth2ServiceConfiguration, Service, ServiceConfiguration,
};
use tokenguard::{AudienceValidator, JwtToken, ValidationResult};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

/// Check whether a JWT access token was issued for this application
#[derive(Parser, Debug)]
#[command(
    name = "tokenguard-demo",
    version,
    about = "Check whether a JWT access token was issued for a service binding",
    long_about = "Decodes a JWT (without verifying its signature) and runs the audience trust \
                  decision against the client ids of a service binding.\n\n\
                  SECURITY WARNING:\n\
                  - Tokens passed as arguments may end up in shell history; prefer '-' and stdin"
)]
struct Cli {
    /// Credentials file of the service binding (.json, .toml, .yaml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Identity service that issued the token
    #[arg(long, short = 's', default_value = "xsuaa")]
    service: Service,

    /// Additional trusted client id (repeatable)
    #[arg(long = "client-id")]
    client_ids: Vec<String>,

    /// Environment variable prefix overriding credentials file values
    #[arg(long, default_value = DEFAULT_ENV_PREFIX)]
    env_prefix: String,

    /// Disable matching of broker-cloned client ids
    #[arg(long)]
    no_broker_clone: bool,

    /// Enable verbose logging (-v, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Encoded token, or '-' to read it from stdin
    token: String,
}

impl Cli {
    /// Initialize tracing subscriber, `RUST_LOG` wins over verbosity flags
    fn init_tracing(&self) {
        let level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        };

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(level.to_string())),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    fn read_token(&self) -> anyhow::Result<String> {
        if self.token != "-" {
            return Ok(self.token.clone());
        }

        let mut token = String::new();
        std::io::stdin()
            .read_to_string(&mut token)
            .context("failed to read token from stdin")?;
        if token.trim().is_empty() {
            bail!("no token on stdin");
        }
        Ok(token)
    }

    fn run(&self) -> anyhow::Result<bool> {
        let mut builder = AudienceValidator::builder().broker_clone_matching(!self.no_broker_clone);

        if let Some(path) = &self.config {
            let binding = OAuth2ServiceConfiguration::from_file_with_prefix(
                path,
                self.service,
                &self.env_prefix,
            )
            .with_context(|| format!("failed to load credentials from {}", path.display()))?;

            info!(
                client_id = binding.client_id(),
                service = %binding.service(),
                "Loaded service binding"
            );
            builder = builder.configuration(&binding);
        }

        let validator = builder
            .trusted_client_ids(self.client_ids.iter().cloned())
            .build()
            .context("failed to configure audience validator (pass --config or --client-id)")?;

        let token = JwtToken::parse(&self.read_token()?, self.service)
            .context("failed to decode token")?;

        match validator.validate(&token) {
            ValidationResult::Valid => {
                println!("valid");
                Ok(true)
            }
            ValidationResult::Invalid(failure) => {
                println!("invalid: {failure}");
                Ok(false)
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.init_tracing();

    match cli.run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
