pub mod errors;
pub mod operations;
pub mod types;

pub use errors::ProcessError;
pub use operations::{get_process_info, is_process_running, kill_process};
pub use types::{Pid, ProcessInfo, ProcessStatus};
