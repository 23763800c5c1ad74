use super::*;
use pretty_assertions::assert_eq;

fn blocked(command: &str) -> String {
    match preflight(command) {
        Verdict::Blocked(reason) => reason,
        other => panic!("expected {command:?} to be blocked, got {other:?}"),
    }
}

#[test]
fn test_bare_interactive_programs_are_blocked() {
    assert_eq!(
        blocked("bash"),
        "'bash' would start an interactive Bash shell."
    );
    assert_eq!(
        blocked("python3"),
        "'python3' would start an interactive Python REPL."
    );
    assert_eq!(blocked("zsh"), "'zsh' would start an interactive Z-shell.");
    assert_eq!(
        blocked("pwsh"),
        "'pwsh' would start an interactive PowerShell (Core)."
    );
}

#[test]
fn test_program_name_is_case_insensitive() {
    assert_eq!(
        blocked("PowerShell.EXE"),
        "'powershell.exe' would start an interactive PowerShell."
    );
    assert_eq!(blocked("  Python  "), "'python' would start an interactive Python REPL.");
}

#[test]
fn test_interactive_flags_are_blocked() {
    assert_eq!(blocked("bash -i"), "'bash -i' requests interactive mode.");
    assert_eq!(
        blocked("python --interactive"),
        "'python --interactive' requests interactive mode."
    );
    assert_eq!(
        blocked("pwsh -NoExit"),
        "'pwsh -NoExit' requests interactive mode."
    );
}

#[test]
fn test_non_interactive_invocations_pass() {
    assert_eq!(preflight("bash -c 'echo hi'"), Verdict::Clear);
    assert_eq!(preflight("python3 script.py"), Verdict::Clear);
    assert_eq!(preflight("sh -c ls"), Verdict::Clear);
    assert_eq!(preflight("ls -la"), Verdict::Clear);
    assert_eq!(preflight("echo bash"), Verdict::Clear);
}

#[test]
fn test_only_second_token_is_inspected() {
    assert_eq!(preflight("bash script.sh -i"), Verdict::Clear);
}

#[test]
fn test_empty_command_is_clear() {
    assert_eq!(preflight(""), Verdict::Clear);
    assert_eq!(preflight("   "), Verdict::Clear);
}

#[cfg(unix)]
#[test]
fn test_quoted_program_is_unquoted() {
    assert_eq!(
        blocked("'bash'"),
        "'bash' would start an interactive Bash shell."
    );
}

#[cfg(unix)]
#[test]
fn test_unbalanced_quotes_fall_back_to_whitespace() {
    assert_eq!(blocked("bash -i 'oops"), "'bash -i' requests interactive mode.");
    assert_eq!(preflight("echo 'unterminated"), Verdict::Clear);
}

#[test]
fn test_prompt_suffixes_warn() {
    let prompts = [
        "building...\n>>> ",
        "In [3]: ",
        "done\nuser@host:~/src$ ",
        "C:\\Users\\dev> ",
        "PS C:\\work> ",
    ];
    for output in prompts {
        assert_eq!(
            postflight(output),
            Verdict::Warned(PROMPT_WARNING.to_string()),
            "output: {output:?}"
        );
    }
}

#[test]
fn test_prompt_must_match_whole_line() {
    assert_eq!(postflight("see >>> above"), Verdict::Clear);
    assert_eq!(postflight(">>> \nall done"), Verdict::Clear);
    assert_eq!(postflight("In [x]: "), Verdict::Clear);
}

#[test]
fn test_trailing_blank_lines_are_ignored() {
    assert_eq!(
        postflight(">>>\n\n  \n"),
        Verdict::Warned(PROMPT_WARNING.to_string())
    );
}

#[test]
fn test_plain_output_is_clear() {
    assert_eq!(postflight(""), Verdict::Clear);
    assert_eq!(postflight("hello\nworld\n"), Verdict::Clear);
    assert_eq!(postflight("ok"), Verdict::Clear);
}
