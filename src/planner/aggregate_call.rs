use crate::{database::{Catalog, FieldDescriptor}, error::{EngineError, Result}, parser::{AggregateCall, AggregateFunc}};

/// An aggregation with its target resolved against the catalog.
#[derive(Clone, PartialEq, Debug)]
pub struct ResolvedAggregate {
    pub func: AggregateFunc,
    pub target: Option<FieldDescriptor>,
    pub header: String,
}

impl ResolvedAggregate {
    pub fn resolve(call: &AggregateCall, catalog: &Catalog) -> Result<Self> {
        let target = match &call.target {
            Some(column) => Some(
                *catalog
                    .field(&column.label)
                    .ok_or_else(|| EngineError::UnknownColumn(column.label.clone()))?,
            ),
            None => None,
        };

        Ok(Self { func: call.func, target, header: call.header() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{database::FieldKey, parser::{ColumnRef, Span}};

    #[test]
    fn resolves_target_and_keeps_header() {
        let call = AggregateCall::new(AggregateFunc::Avg, Some(ColumnRef::new("CPU Percent", Span::new(8, 19))));
        let resolved = ResolvedAggregate::resolve(&call, Catalog::standard()).unwrap();

        assert_eq!(resolved.target.unwrap().key, FieldKey::CpuPercent);
        assert_eq!(resolved.header, "avg(CPU Percent)");
    }

    #[test]
    fn count_without_target() {
        let call = AggregateCall::new(AggregateFunc::Count, None);
        let resolved = ResolvedAggregate::resolve(&call, Catalog::standard()).unwrap();

        assert!(resolved.target.is_none());
        assert_eq!(resolved.header, "count()");
    }

    #[test]
    fn unknown_target_is_an_evaluation_error() {
        let call = AggregateCall::new(AggregateFunc::Sum, Some(ColumnRef::new("uptime", Span::new(8, 14))));
        let err = ResolvedAggregate::resolve(&call, Catalog::standard()).unwrap_err();

        assert!(matches!(err, EngineError::UnknownColumn(ref label) if label == "uptime"));
        assert_eq!(err.position(), None);
    }
}
