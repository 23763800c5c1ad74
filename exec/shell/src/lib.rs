//! Bounded shell command execution for the shellgate worker.
//!
//! This crate provides:
//! - Pre-flight refusal of commands that would open an interactive shell or REPL
//! - Spawning commands in their own process group with one combined output stream
//! - Concurrent output draining into an in-memory buffer and the log
//! - Timeout enforcement that terminates the whole process tree
//! - Post-flight warnings when output ends in something that looks like a prompt
//!
//! ```no_run
//! use shellgate_config::GatewayConfig;
//! use shellgate_shell::ExecutionSupervisor;
//!
//! # async fn example() {
//! let supervisor = ExecutionSupervisor::from_config(&GatewayConfig::default());
//! let result = supervisor.run("cargo --version", 30).await;
//! assert!(result.warning.is_none());
//! # }
//! ```

pub mod classifier;
pub mod command;
pub mod error;
pub mod process;
pub mod pump;
pub mod supervisor;

pub use classifier::Verdict;
pub use command::ExecRequest;
pub use command::ExecutionResult;
pub use error::ShellError;
pub use process::ProcessHandle;
pub use process::ProcessRunner;
pub use process::ProcessState;
pub use process::UNKNOWN_EXIT_CODE;
pub use pump::OutputBuffer;
pub use pump::OutputPump;
pub use supervisor::ExecutionSupervisor;
