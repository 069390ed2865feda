pub mod eval;
pub mod helpers;
pub mod plan_executor;
pub mod result;

pub use plan_executor::{Execution, ExecutionStats, Executor, PlanExecutor};
pub use result::{to_csv, QueryMetadata, QueryResult};
