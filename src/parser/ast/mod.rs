pub mod query;
pub use query::*;

pub mod clause;
pub use clause::*;

pub mod column;
pub use column::*;

pub mod function;
pub use function::*;

pub mod projection_parser;
pub use projection_parser::*;

pub mod scope;
pub use scope::*;

pub mod filter;
pub use filter::*;

pub mod group_by;
pub use group_by::*;

pub mod order_by;
pub use order_by::*;

pub mod limit_parser;
pub use limit_parser::*;

pub mod warning;
pub use warning::*;
