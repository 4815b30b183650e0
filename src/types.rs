use std::path::PathBuf;

/// Everything the worker needs for one batch, fixed at start time.
#[derive(Clone, Debug)]
pub struct ConversionJob {
    pub folder: PathBuf,
    pub reduce_to_1080p: bool,
}

#[derive(Clone, Debug)]
pub enum ProgressMessage {
    /// Sent after each file, whether it converted or was skipped.
    Progress { percent: u8, file: String },
    Completed,
}

/// UI lifecycle of a job. There is no cancelled state; a started job
/// runs to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobPhase {
    Idle,
    Running,
    Completed,
}
