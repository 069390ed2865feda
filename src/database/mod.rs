pub mod machine;
pub use machine::*;

pub mod catalog;
pub use catalog::*;

pub mod inventory;
pub use inventory::*;

pub mod saved_queries;
pub use saved_queries::*;

pub mod config;
pub use config::*;

pub mod db;
pub use db::*;
