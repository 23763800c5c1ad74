//! shellgate - bounded shell command execution for agents, served over stdio.

mod supervise;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use shellgate_config::GatewayConfig;
use shellgate_config::load_config;
use shellgate_shell::ExecutionSupervisor;
use tracing::error;
use tracing::info;

use crate::supervise::WorkerSupervisor;

#[derive(Parser, Debug)]
#[command(name = "shellgate", version)]
#[command(about = "Run shell commands for an agent with timeouts and process-tree cleanup")]
struct Cli {
    /// Path to config file (default: ./shellgate.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log file, overriding the config file and environment
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log filter directive, e.g. "info" or "shellgate_shell=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve tools as JSON-RPC on stdin/stdout (default)
    Serve,

    /// Run the server as a child and respawn it whenever it asks to restart
    Supervise,

    /// Run a single command and print the result as JSON
    Exec {
        /// Command line passed to the platform shell
        command: String,
        /// Timeout in seconds (default from config)
        #[arg(short, long, allow_negative_numbers = true)]
        timeout: Option<i64>,
    },
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<GatewayConfig> {
        let mut config = load_config(self.config.as_deref()).context("failed to load config")?;
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
        if let Some(log_level) = &self.log_level {
            config.log_level = log_level.clone();
        }
        Ok(config)
    }

    /// Arguments for a `serve` child that sees the same configuration.
    fn worker_args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from("serve")];
        if let Some(config) = &self.config {
            args.push("--config".into());
            args.push(config.clone().into_os_string());
        }
        if let Some(log_file) = &self.log_file {
            args.push("--log-file".into());
            args.push(log_file.clone().into_os_string());
        }
        if let Some(log_level) = &self.log_level {
            args.push("--log-level".into());
            args.push(log_level.into());
        }
        args
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            1
        }
    };
    shellgate_server::shutdown_logging();
    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = cli.resolve_config()?;
    if let Err(e) = shellgate_server::init_logging(&config) {
        eprintln!("Warning: {e}");
    }

    match &cli.command {
        None | Some(Command::Serve) => {
            info!(pid = std::process::id(), "worker starting");
            shellgate_server::serve_stdio(&config).await?;
            Ok(0)
        }
        Some(Command::Supervise) => {
            let program = std::env::current_exe().context("failed to locate own executable")?;
            WorkerSupervisor::new(program, cli.worker_args(), config.restart_exit_code)
                .run()
                .await
        }
        Some(Command::Exec { command, timeout }) => {
            let supervisor = ExecutionSupervisor::from_config(&config);
            let timeout = timeout.unwrap_or(config.default_timeout_secs);
            let result = supervisor.run(command, timeout).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.warning.is_some() { 1 } else { 0 })
        }
    }
}

#[cfg(test)]
#[path = "main.test.rs"]
mod tests;
