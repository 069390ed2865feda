pub mod count_impl;
pub use count_impl::*;

pub mod sum_impl;
pub use sum_impl::*;

pub mod avg_impl;
pub use avg_impl::*;

pub mod minmax_impl;
pub use minmax_impl::*;

use crate::{database::CellValue, error::{EngineError, Result}};

/// Float form of the single argument of a numeric aggregate.
/// No argument, null and text that does not parse all give `None`.
pub(crate) fn numeric_arg(name: &str, args: &[CellValue<'_>]) -> Result<Option<f64>> {
    match args {
        [] => Ok(None),
        [v] => Ok(v.as_f64()),
        _ => Err(EngineError::UnsupportedAggregate(format!("{}() takes at most one column", name))),
    }
}
