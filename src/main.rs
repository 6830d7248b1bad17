// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! authtel main entry point - inspect headers, redact URLs and fold event streams.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use url::Url;

use authtel::config::{self, CliOptions};
use authtel::logging::{init_logging, LogConfig};
use authtel::redact;
use authtel::{
    header, CacheEvent, HttpEvent, JsonLinesSink, KnownHosts, RequestId, ResolvedConfig, Result,
    Telemetry,
};

/// authtel version string.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// authtel - telemetry aggregation toolkit for auth clients.
#[derive(Parser)]
#[command(name = "authtel")]
#[command(author, version, about = "Telemetry aggregation toolkit for auth clients", long_about = None)]
struct Cli {
    /// Additional host whose request paths may be recorded (repeatable)
    #[arg(long = "known-host", global = true)]
    known_hosts: Vec<String>,

    /// How recorded events are dispatched
    #[arg(long, value_enum, global = true, env = "AUTHTEL_DISPATCH_MODE")]
    dispatch_mode: Option<Mode>,

    /// Log filter directive
    #[arg(long, global = true, env = "AUTHTEL_LOG")]
    log_level: Option<String>,

    /// Show debug output
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Dispatch modes accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// One record per request, emitted at flush
    Aggregated,
    /// One record per event, emitted immediately
    PerEvent,
}

impl From<Mode> for config::DispatchMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Aggregated => config::DispatchMode::Aggregated,
            Mode::PerEvent => config::DispatchMode::PerEvent,
        }
    }
}

/// Subcommands for authtel.
#[derive(Subcommand)]
enum Commands {
    /// Parse an x-ms-clitelem header value
    Header {
        /// Raw header value
        value: String,
    },

    /// Print the loggable form of a request URL
    Redact {
        /// Request URL
        url: String,

        /// Extra host to recognize for this URL only (repeatable)
        #[arg(long = "host")]
        hosts: Vec<String>,
    },

    /// Fold a JSON-lines stream of events into a dispatch record
    Fold {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Initialize a new configuration file
    Init,

    /// Show version information
    Version,
}

/// Config subcommand actions.
#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
}

/// One line of `authtel fold` input.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum EventInput {
    Http(HttpInput),
    Cache(CacheInput),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpInput {
    name: Option<String>,
    method: Option<String>,
    url: Option<String>,
    response_code: Option<u16>,
    oauth_error_code: Option<String>,
    request_id: Option<String>,
    cli_telem: Option<String>,
    user_agent: Option<String>,
    api_version: Option<String>,
    query_parameters: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheInput {
    name: Option<String>,
    token_type: Option<String>,
    is_rt: Option<bool>,
    is_mrrt: Option<bool>,
    is_frt: Option<bool>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cli_options = CliOptions {
        known_hosts: cli.known_hosts,
        dispatch_mode: cli.dispatch_mode.map(Into::into),
        log_level: cli.log_level,
    };

    let workspace_root = std::env::current_dir()?;
    let resolved = config::load_config(&workspace_root, cli_options)?;

    let log_config = if cli.debug {
        LogConfig::development()
    } else {
        LogConfig::from_resolved(&resolved)
    };
    let _guard = init_logging(&log_config)?;

    match cli.command {
        Commands::Header { value } => handle_header(&value)?,
        Commands::Redact { url, hosts } => handle_redact(&resolved, &url, &hosts)?,
        Commands::Fold { file } => handle_fold(&resolved, file)?,
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            }
        },
        Commands::Init => {
            let path = config::init_config(&workspace_root, None)?;
            println!("Created config file: {}", path.display());
        }
        Commands::Version => {
            println!("authtel {}", VERSION);
        }
    }
    Ok(())
}

fn handle_header(value: &str) -> Result<()> {
    match header::parse(value) {
        Ok(Some(descriptor)) => println!("{}", serde_json::to_string_pretty(&descriptor)?),
        Ok(None) => println!("Header is blank; no fields recorded"),
        Err(err) => anyhow::bail!("{}: {}", err.code(), err),
    }
    Ok(())
}

fn handle_redact(config: &ResolvedConfig, raw: &str, extra_hosts: &[String]) -> Result<()> {
    let url = Url::parse(raw).with_context(|| format!("Invalid URL: {}", raw))?;
    let hosts = redact_hosts(config, extra_hosts);
    match redact::sanitize_path(&url, &hosts) {
        Some(path) => println!("{}", path),
        None => println!(
            "Host {} is not a known host; path not recorded",
            redact::authority(&url)
        ),
    }
    Ok(())
}

/// Known hosts from configuration plus any given with `redact --host`.
fn redact_hosts(config: &ResolvedConfig, extra_hosts: &[String]) -> KnownHosts {
    let mut hosts = config.known_hosts.clone();
    hosts.extend(extra_hosts);
    hosts
}

fn handle_fold(config: &ResolvedConfig, file: Option<PathBuf>) -> Result<()> {
    let reader: Box<dyn BufRead> = match file {
        Some(path) => {
            let file = std::fs::File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let sink = Arc::new(JsonLinesSink::new(std::io::stdout()));
    let telemetry = Telemetry::from_config(config, sink);
    let request = RequestId::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let input: EventInput = serde_json::from_str(&line)
            .with_context(|| format!("Line {}: invalid event", index + 1))?;

        match input {
            EventInput::Http(input) => {
                let event = build_http_event(&telemetry, input)
                    .with_context(|| format!("Line {}: invalid http event", index + 1))?;
                telemetry.record(request, event)?;
            }
            EventInput::Cache(input) => {
                telemetry.record(request, build_cache_event(&telemetry, input))?;
            }
        }
    }

    telemetry.flush(request)?;
    Ok(())
}

fn build_http_event(telemetry: &Telemetry, input: HttpInput) -> Result<HttpEvent> {
    let mut event = telemetry.http_event(input.name.as_deref().unwrap_or("http_event"));

    if let Some(user_agent) = &input.user_agent {
        event.set_user_agent(user_agent);
    }
    if let Some(method) = &input.method {
        event.set_method(method);
    }
    if let Some(query) = &input.query_parameters {
        event.set_query_parameters(query);
    }
    if let Some(code) = input.response_code {
        event.set_response_code(code);
    }
    if let Some(version) = &input.api_version {
        event.set_api_version(version);
    }
    if let Some(raw) = &input.url {
        let url = Url::parse(raw).with_context(|| format!("Invalid URL: {}", raw))?;
        event.set_http_path(&url, telemetry.known_hosts());
    }
    if let Some(code) = &input.oauth_error_code {
        event.set_oauth_error_code(code);
    }
    if let Some(id) = &input.request_id {
        event.set_request_id_header(id);
    }
    if let Some(raw) = &input.cli_telem {
        event.set_x_ms_cli_telem_data(raw);
    }

    Ok(event)
}

fn build_cache_event(telemetry: &Telemetry, input: CacheInput) -> CacheEvent {
    let mut event = telemetry.cache_event(input.name.as_deref().unwrap_or("token_cache_lookup"));

    if let Some(token_type) = &input.token_type {
        event.set_token_type(token_type);
    }
    if input.is_rt.is_some() || input.is_mrrt.is_some() || input.is_frt.is_some() {
        event.set_token_type_flags(
            input.is_rt.unwrap_or(false),
            input.is_mrrt.unwrap_or(false),
            input.is_frt.unwrap_or(false),
        );
    }

    event
}
