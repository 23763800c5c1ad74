//! Pre-flight and post-flight command checks.
//!
//! [`preflight`] refuses commands that would start an interactive shell or
//! REPL, which would otherwise sit waiting for input until the timeout.
//! [`postflight`] flags output whose last line looks like a prompt; it is an
//! advisory heuristic and never fails a command.

use std::sync::LazyLock;

use regex::Regex;

/// Warning attached when output ends in something that looks like a prompt.
pub const PROMPT_WARNING: &str = "Output ends with a prompt-like string.";

/// Program names that open an interactive session when run without arguments.
const INTERACTIVE_SHELLS: &[(&str, &str)] = &[
    ("python", "Python REPL"),
    ("python3", "Python REPL"),
    ("py", "Python REPL"),
    ("bash", "Bash shell"),
    ("sh", "POSIX shell"),
    ("zsh", "Z-shell"),
    ("cmd", "Windows CMD"),
    ("cmd.exe", "Windows CMD"),
    ("powershell", "PowerShell"),
    ("powershell.exe", "PowerShell"),
    ("pwsh", "PowerShell (Core)"),
    ("pwsh.exe", "PowerShell (Core)"),
];

/// Second-token flags that force interactive mode. Compared lowercase.
const INTERACTIVE_FLAGS: &[&str] = &["-i", "--interactive", "-noexit"];

/// Each pattern must match the whole last line.
const PROMPT_PATTERNS: &[&str] = &[
    r">>> ?",
    r"In \[\d+\]: ?",
    r".+@.+:\S+\$ ?",
    r"[A-Za-z]:\\.*?> ?",
    r"PS [A-Za-z]:\\.*?> ?",
];

#[allow(clippy::expect_used)]
static PROMPT_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PROMPT_PATTERNS
        .iter()
        .map(|pattern| Regex::new(&format!("^(?:{pattern})$")).expect("valid prompt pattern"))
        .collect()
});

/// Result of a classifier check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing to report.
    Clear,
    /// The command must not be run.
    Blocked(String),
    /// The command ran but the caller should be told something.
    Warned(String),
}

/// Checks a command before it is spawned.
///
/// Blocks a known interactive program run with no arguments, or whose first
/// argument is an interactive flag. Any other argument (`bash -c ...`,
/// `python script.py`) is allowed through.
pub fn preflight(command: &str) -> Verdict {
    let tokens = tokenize(command);
    let Some(first) = tokens.first() else {
        return Verdict::Clear;
    };
    let program = first.to_lowercase();
    let Some(description) = interactive_description(&program) else {
        return Verdict::Clear;
    };

    match tokens.get(1) {
        None => Verdict::Blocked(format!(
            "'{program}' would start an interactive {description}."
        )),
        Some(flag) if is_interactive_flag(flag) => {
            Verdict::Blocked(format!("'{program} {flag}' requests interactive mode."))
        }
        Some(_) => Verdict::Clear,
    }
}

/// Checks captured output after the command has finished.
pub fn postflight(output: &str) -> Verdict {
    let Some(last_line) = output.trim_end().lines().last() else {
        return Verdict::Clear;
    };
    if PROMPT_REGEXES.iter().any(|re| re.is_match(last_line)) {
        Verdict::Warned(PROMPT_WARNING.to_string())
    } else {
        Verdict::Clear
    }
}

fn interactive_description(program: &str) -> Option<&'static str> {
    INTERACTIVE_SHELLS
        .iter()
        .find(|(name, _)| *name == program)
        .map(|(_, description)| *description)
}

fn is_interactive_flag(token: &str) -> bool {
    let token = token.to_lowercase();
    INTERACTIVE_FLAGS.contains(&token.as_str())
}

/// POSIX quoting rules where the command runs under `/bin/sh`.
///
/// Unbalanced quotes fall back to whitespace splitting so the command still
/// gets classified.
#[cfg(unix)]
fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command).unwrap_or_else(|| split_whitespace(command))
}

#[cfg(not(unix))]
fn tokenize(command: &str) -> Vec<String> {
    split_whitespace(command)
}

fn split_whitespace(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
#[path = "classifier.test.rs"]
mod tests;
