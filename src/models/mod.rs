pub mod task;

pub use task::{SortBy, StatusFilter, Task, TaskInput, TaskQuery, TaskUpdate};
