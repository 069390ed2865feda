pub mod parser;

pub mod database;
pub use database::{Catalog, Db, DbRunner, EngineConfig, Invocation, MemoryInventory, SavedQueryStore};

pub mod planner;

pub mod executor;
pub use executor::QueryResult;

pub mod error;
pub use error::{EngineError, Result};

pub mod cli;
