mod types;

pub use types::{truncate_title, Priority, TaskRecord, TITLE_MAX_CHARS};
