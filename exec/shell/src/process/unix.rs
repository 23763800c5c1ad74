use tokio::process::Command;
use tracing::trace;

use super::ProcessGroup;

const SHELL: &str = "/bin/sh";

/// `/bin/sh -c` in a fresh session; signals go to the whole group.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixProcessGroup;

impl ProcessGroup for UnixProcessGroup {
    fn shell_command(&self, command: &str) -> Command {
        let mut cmd = Command::new(SHELL);
        cmd.arg("-c").arg(command);

        // The child becomes session and group leader, so its pgid equals its pid.
        unsafe {
            cmd.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
        cmd
    }

    fn soft_interrupt(&self, pid: u32) -> bool {
        signal_group(pid, libc::SIGTERM)
    }

    fn hard_kill_tree(&self, pid: u32) {
        signal_group(pid, libc::SIGKILL);
    }
}

fn signal_group(pid: u32, signal: libc::c_int) -> bool {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    if unsafe { libc::killpg(pgid, signal) } == -1 {
        // ESRCH: the group is already gone.
        let err = std::io::Error::last_os_error();
        trace!(pgid, signal, "killpg failed: {err}");
        return false;
    }
    true
}
