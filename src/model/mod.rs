pub mod config;
pub mod date;
pub mod store;

pub use config::*;
pub use date::*;
pub use store::*;
