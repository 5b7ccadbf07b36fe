pub mod calendar;
pub mod export;
pub mod task_ops;
