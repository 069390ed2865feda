use tracing::debug;

use crate::{
    database::{Catalog, FieldDescriptor},
    error::{EngineError, Result},
    parser::ParsedQuery,
    planner::{aggregate_call::ResolvedAggregate, logical_plan::{GroupKey, LogicalPlan, ProjectedColumn}},
};

pub struct PlanBuilder;

impl PlanBuilder {
    /// Lowers a parsed question to `Scan -> [Scope] -> Filter* -> Project|Aggregate -> [Sort] -> [Limit]`.
    ///
    /// `default_column` is the header used when the question lists no
    /// columns and no aggregations.
    pub fn from_parsed(query: &ParsedQuery, catalog: &Catalog, default_column: &str) -> Result<LogicalPlan> {
        let mut plan = LogicalPlan::Scan;

        if let Some(group) = query.scope.group_name() {
            plan = LogicalPlan::Scope { input: Box::new(plan), group: group.to_string() };
        }

        for filter in &query.filters {
            plan = LogicalPlan::Filter { input: Box::new(plan), filter: filter.clone() };
        }

        if query.is_aggregate() {
            let aggs = query
                .aggregations
                .iter()
                .map(|call| ResolvedAggregate::resolve(call, catalog))
                .collect::<Result<Vec<_>>>()?;

            // group by only partitions aggregate output
            let group_by = match &query.group_by {
                Some(clause) => Some(GroupKey {
                    header: clause.column.label.clone(),
                    field: Self::resolve(catalog, &clause.column.label)?,
                }),
                None => None,
            };

            plan = LogicalPlan::Aggregate { input: Box::new(plan), group_by, aggs };
        } else {
            let columns = if query.columns.is_empty() {
                vec![ProjectedColumn { header: default_column.to_string(), field: Self::resolve(catalog, default_column)? }]
            } else {
                query
                    .columns
                    .iter()
                    .map(|c| Ok(ProjectedColumn { header: c.label.clone(), field: Self::resolve(catalog, &c.label)? }))
                    .collect::<Result<Vec<_>>>()?
            };

            plan = LogicalPlan::Project { input: Box::new(plan), columns };
        }

        if let Some(order_by) = &query.order_by {
            plan = LogicalPlan::Sort {
                input: Box::new(plan),
                key: order_by.column.label.clone(),
                ascending: order_by.ascending,
            };
        }

        if let Some(limit) = query.limit {
            plan = LogicalPlan::Limit { input: Box::new(plan), limit };
        }

        debug!(plan = ?plan.describe(), "built plan");
        Ok(plan)
    }

    fn resolve(catalog: &Catalog, label: &str) -> Result<FieldDescriptor> {
        catalog.field(label).copied().ok_or_else(|| EngineError::UnknownColumn(label.to_string()))
    }
}
