mod task;

pub use task::{DEFAULT_CATEGORY, Priority, Task, TaskStatus, now_timestamp, utc_timestamp};
