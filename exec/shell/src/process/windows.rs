use std::process::Stdio;

use tokio::process::Command;
use tracing::trace;
use winapi::um::wincon::CTRL_BREAK_EVENT;
use winapi::um::wincon::GenerateConsoleCtrlEvent;

use super::ProcessGroup;

const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// `cmd /C` in a new console process group; `taskkill /T /F` as the hard kill.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsProcessGroup;

impl ProcessGroup for WindowsProcessGroup {
    fn shell_command(&self, command: &str) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C")
            .raw_arg(command)
            .creation_flags(CREATE_NEW_PROCESS_GROUP);
        cmd
    }

    fn soft_interrupt(&self, pid: u32) -> bool {
        // CTRL_BREAK reaches every process in the group led by `pid`.
        unsafe { GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid) != 0 }
    }

    fn hard_kill_tree(&self, pid: u32) {
        let status = std::process::Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/T", "/F"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = status {
            trace!(pid, "taskkill failed: {e}");
        }
    }
}
