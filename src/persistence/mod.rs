pub mod files;
pub mod store;

pub use files::{atomic_write, ensure_data_dir, get_data_dir, init_local_campus};
pub use store::DocStore;

/// Backing file for the task collection and its id counter
pub const TASKS_FILE: &str = "data.json";
/// Backing file for the append-only time entry log
pub const TIME_TRACKING_FILE: &str = "time_tracking.json";
/// Backing file for soft-deleted tasks
pub const RECYCLE_BIN_FILE: &str = "recycle_bin.json";
/// Backing file for feedback submissions
pub const SURVEY_FILE: &str = "survey.json";
