//! Language server binary for Java
//!
//! Speaks LSP over stdin/stdout. Logs go to stderr, since stdout carries the protocol.
//!
//! Configuration layers, lowest first: built-in defaults, `java-lsp.toml` in the working
//! directory when present, the `--config` file, then `--log-level`.
//!
//! Usage:
//!   java-lsp [--config `<path>`] [--log-level `<filter>`]

use anyhow::Context;
use clap::{Arg, Command};
use java_config::{JavaLspConfig, Loader};
use java_lsp::JavaLanguageServer;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

const WORKSPACE_CONFIG: &str = "java-lsp.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("java-lsp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Language server for Java source files")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("TOML file layered over the defaults and ./java-lsp.toml"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("FILTER")
                .help("Log filter, e.g. 'debug' or 'java_lsp=trace' (RUST_LOG wins when set)"),
        )
        .get_matches();

    let config = load_config(
        matches.get_one::<String>("config").map(String::as_str),
        matches.get_one::<String>("log-level").map(String::as_str),
    )?;
    init_tracing(&config)?;

    tracing::info!(name = %config.server.name, "starting");
    let (service, socket) =
        LspService::new(move |client| JavaLanguageServer::new(client, config.clone()));
    Server::new(stdin(), stdout(), socket).serve(service).await;
    tracing::info!("stopped");
    Ok(())
}

fn load_config(path: Option<&str>, log_level: Option<&str>) -> anyhow::Result<JavaLspConfig> {
    let mut loader = Loader::new().with_optional_file(WORKSPACE_CONFIG);
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    if let Some(filter) = log_level {
        loader = loader
            .set_override("logging.filter", filter)
            .context("applying --log-level")?;
    }
    let config = loader.build();
    match path {
        Some(path) => config.with_context(|| format!("loading configuration from {path}")),
        None => {
            config.with_context(|| format!("loading defaults and optional {WORKSPACE_CONFIG}"))
        }
    }
}

fn init_tracing(config: &JavaLspConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.logging.filter)
            .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
    Ok(())
}
