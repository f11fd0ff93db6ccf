//! netsandbox: provision and tear down an ephemeral EC2 network sandbox
//!
//! Reads one request (JSON file, stdin, or flags), runs the matching phase
//! and prints the result JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use netsandbox::Dispatcher;
use netsandbox::aws::{AwsContext, Ec2Client};
use netsandbox::config::{AwsConfig, WaitSettings};
use netsandbox_common::defaults::DEFAULT_REGION;
use netsandbox_common::{InvocationResult, Mode};
use serde_json::Value;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "netsandbox")]
#[command(about = "Ephemeral EC2 network sandbox: provision on start, tear down by tags on stop")]
#[command(version)]
struct Args {
    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// AWS profile to use (overrides default credential resolution)
    #[arg(long, global = true, env = "AWS_PROFILE")]
    aws_profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Request source and overrides shared by `start` and `stop`
#[derive(clap::Args, Debug)]
struct PhaseArgs {
    /// Request JSON file, `-` for stdin (default: all defaults)
    #[arg(long)]
    event: Option<PathBuf>,

    /// Override the name tag value
    #[arg(long)]
    tag_name_value: Option<String>,

    /// Override the project tag value
    #[arg(long)]
    tag_project_value: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch a request as given; the `state` field selects the phase
    Invoke {
        /// Request JSON file, `-` for stdin (default: all defaults)
        #[arg(long)]
        event: Option<PathBuf>,
    },

    /// Provision the sandbox
    Start(PhaseArgs),

    /// Tear the sandbox down
    Stop(PhaseArgs),
}

impl Command {
    /// Load the request and apply the subcommand's overrides
    async fn into_event(self) -> Result<Value> {
        let (mode, args) = match self {
            Command::Invoke { event } => return read_event(event.as_ref()).await,
            Command::Start(args) => (Mode::Start, args),
            Command::Stop(args) => (Mode::Stop, args),
        };

        let mut value = read_event(args.event.as_ref()).await?;
        if value.is_null() {
            value = Value::Object(Default::default());
        }
        let object = value
            .as_object_mut()
            .context("Request must be a JSON object")?;

        object.insert("state".to_string(), Value::from(mode.to_string()));
        if let Some(name) = args.tag_name_value {
            object.insert("tag_name_value".to_string(), Value::from(name));
        }
        if let Some(project) = args.tag_project_value {
            object.insert("tag_project_value".to_string(), Value::from(project));
        }
        Ok(value)
    }
}

/// Read a request from a file or stdin; no source means "all defaults"
async fn read_event(source: Option<&PathBuf>) -> Result<Value> {
    let text = match source {
        None => return Ok(Value::Null),
        Some(path) if path.as_os_str() == "-" => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read request from stdin")?;
            text
        }
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read request file {}", path.display()))?,
    };

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).context("Request is not valid JSON")
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(result) if result.is_success() => {}
        Ok(_) => std::process::exit(1),
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(
            stderr,
            "\n\x1b[2mSet RUST_BACKTRACE=1 for a detailed backtrace\x1b[0m"
        );
    } else {
        let backtrace = e.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            let _ = writeln!(stderr, "\n\x1b[2mBacktrace:\x1b[0m\n{backtrace}");
        }
    }
}

async fn run() -> Result<InvocationResult> {
    let args = Args::parse();

    // stdout carries the result JSON, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let aws_config = AwsConfig {
        region: args.region,
        aws_profile: args.aws_profile,
    };
    if let Some(profile) = &aws_config.aws_profile {
        info!(profile = %profile, "Using AWS profile");
    }

    let result = match args.command.into_event().await {
        Ok(event) => {
            let aws =
                AwsContext::with_profile(&aws_config.region, aws_config.aws_profile.as_deref())
                    .await;
            info!(region = %aws.region(), "Loaded AWS configuration");
            let dispatcher =
                Dispatcher::new(Ec2Client::from_context(&aws), WaitSettings::default());
            dispatcher.dispatch(event).await
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Failed to load request");
            load_error(&e)
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result)
}

/// Result for a request that could not be read or parsed as JSON
fn load_error(e: &anyhow::Error) -> InvocationResult {
    InvocationResult::error(format!("{e:#}"))
}
