use sysinfo::{Pid as SysinfoPid, ProcessesToUpdate, System};
use tracing::debug;

use crate::process::errors::ProcessError;
use crate::process::types::{Pid, ProcessInfo, ProcessStatus};

/// Check if a process with the given PID is currently running
pub fn is_process_running(pid: u32) -> Result<bool, ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);
    Ok(system.process(pid_obj).is_some())
}

/// Minimum length required for prefix matching to prevent false positives
/// with short names like "sh", "vi", "go"
const MIN_PREFIX_MATCH_LENGTH: usize = 5;

/// Extract the base name from a path, handling both Unix (/) and Windows (\) separators
fn extract_base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Check if a process name matches an expected name
///
/// Uses strict matching to prevent PID reuse attacks:
/// 1. Exact match (most secure)
/// 2. Base name match after stripping paths
/// 3. Prefix match only for names >= 5 characters (so "scrcpy" matches "scrcpy.exe")
///
/// Returns false rather than risk killing the wrong process.
fn process_name_matches(actual_name: &str, expected_name: &str) -> bool {
    if actual_name == expected_name {
        return true;
    }

    let actual_base = extract_base_name(actual_name);
    let expected_base = extract_base_name(expected_name);

    if actual_base == expected_base {
        return true;
    }

    if expected_base.len() >= MIN_PREFIX_MATCH_LENGTH && actual_base.starts_with(expected_base) {
        debug!(
            "process_name_matches: prefix match - actual='{}', expected='{}'",
            actual_name, expected_name
        );
        return true;
    }

    false
}

/// Kill a process with the given PID, validating it matches expected metadata
pub fn kill_process(
    pid: u32,
    expected_name: Option<&str>,
    expected_start_time: Option<u64>,
) -> Result<(), ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

    match system.process(pid_obj) {
        Some(process) => {
            // Validate process identity to prevent PID reuse
            if let Some(name) = expected_name {
                let actual_name = process.name().to_string_lossy().to_string();
                if !process_name_matches(&actual_name, name) {
                    return Err(ProcessError::PidReused {
                        pid,
                        expected: name.to_string(),
                        actual: actual_name,
                    });
                }
            }

            if let Some(start_time) = expected_start_time
                && process.start_time() != start_time
            {
                return Err(ProcessError::PidReused {
                    pid,
                    expected: format!("start_time={}", start_time),
                    actual: format!("start_time={}", process.start_time()),
                });
            }

            if process.kill() {
                Ok(())
            } else {
                Err(ProcessError::KillFailed {
                    pid,
                    message: "Process kill signal failed".to_string(),
                })
            }
        }
        None => Err(ProcessError::NotFound { pid }),
    }
}

/// Get basic information about a process
pub fn get_process_info(pid: u32) -> Result<ProcessInfo, ProcessError> {
    let mut system = System::new();
    let pid_obj = SysinfoPid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

    match system.process(pid_obj) {
        Some(process) => Ok(ProcessInfo {
            pid: Pid::from_raw(pid),
            name: process.name().to_string_lossy().to_string(),
            status: ProcessStatus::from(process.status()),
            start_time: process.start_time(),
        }),
        None => Err(ProcessError::NotFound { pid }),
    }
}
