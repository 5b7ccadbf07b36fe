pub mod config_io;
pub mod schema;
pub mod store_io;
