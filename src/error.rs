use thiserror::Error;

/// Domain errors callers are expected to match on.
///
/// Fatal I/O problems stay `anyhow::Error`; this enum covers the cases
/// the console reports as a plain rejection message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("estimated time must be at least 1 minute")]
    InvalidEstimate,

    #[error("no task with id {0}")]
    TaskNotFound(u64),

    #[error("no recycle bin entry with id {0}")]
    BinEntryNotFound(u64),

    #[error("a timer is already active for task {0}")]
    TimerBusy(u64),

    #[error("no timer is running")]
    TimerNotRunning,

    #[error("the timer is not paused")]
    TimerNotPaused,

    #[error("feedback text must not be empty")]
    EmptyFeedback,

    #[error("{0}")]
    InvalidInput(String),
}
