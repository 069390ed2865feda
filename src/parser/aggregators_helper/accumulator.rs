use serde_json::Value;

use crate::{database::CellValue, error::Result};

/// The per-group state.
/// The executor will:
///   1) read the aggregation target of every row as a `CellValue`
///   2) call `update(&mut self, &args)`: an empty slice when the call has
///      no target, one value otherwise
///   3) after all rows in the group, call `finalize()`
pub trait Accumulator: Send {
    /// Update the running state with the values of this row.
    fn update(&mut self, args: &[CellValue<'_>]) -> Result<()>;

    /// Produce the final result as a JSON value.
    fn finalize(&self) -> Value;
}
