use std::fmt;

use serde::Serialize;

use crate::parser::ColumnRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    /// Recognition order for `<func>(...)` tokens.
    pub const ALL: [AggregateFunc; 5] = [
        AggregateFunc::Count,
        AggregateFunc::Avg,
        AggregateFunc::Sum,
        AggregateFunc::Min,
        AggregateFunc::Max,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "count",
            AggregateFunc::Sum => "sum",
            AggregateFunc::Avg => "avg",
            AggregateFunc::Min => "min",
            AggregateFunc::Max => "max",
        }
    }
}

impl fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An aggregation requested in the column list, e.g. `avg(cpu percent)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateCall {
    pub func: AggregateFunc,
    pub target: Option<ColumnRef>,
}

impl AggregateCall {
    pub fn new(func: AggregateFunc, target: Option<ColumnRef>) -> Self {
        Self { func, target }
    }

    /// Output header: `func(target)`, or `func()` without a target.
    pub fn header(&self) -> String {
        let arg = self.target.as_ref().map(|t| t.label.as_str()).unwrap_or("");
        format!("{}({})", self.func.name(), arg)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{AggregateCall, AggregateFunc, ColumnRef, Span};

    #[test]
    pub fn test_header_keeps_target_casing() {
        let call = AggregateCall::new(AggregateFunc::Avg, Some(ColumnRef::new("CPU Percent", Span::new(8, 19))));
        assert_eq!(call.header(), "avg(CPU Percent)");

        let call = AggregateCall::new(AggregateFunc::Count, None);
        assert_eq!(call.header(), "count()");
    }
}
