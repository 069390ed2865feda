use crate::{database::FieldDescriptor, parser::Filter, planner::aggregate_call::ResolvedAggregate};

/// Output column of a plain (non-aggregate) table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedColumn {
    pub header: String,
    pub field: FieldDescriptor,
}

/// `group by` key of an aggregate node: the label as written plus its field.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupKey {
    pub header: String,
    pub field: FieldDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    /// One full read of the inventory.
    Scan,

    /// Keep machines of one group (exact, case-sensitive match).
    Scope {
        input: Box<LogicalPlan>,
        group: String,
    },

    /// One predicate; consecutive filter nodes are AND-ed.
    Filter {
        input: Box<LogicalPlan>,
        filter: Filter,
    },

    /// Rows become a table with these columns, in order.
    Project {
        input: Box<LogicalPlan>,
        columns: Vec<ProjectedColumn>,
    },

    /// Rows become one table row per group (or one row without a key).
    Aggregate {
        input: Box<LogicalPlan>,
        group_by: Option<GroupKey>,
        aggs: Vec<ResolvedAggregate>,
    },

    /// Stable sort on the header named `key`, NULLS LAST. A key that names
    /// no header leaves the table unchanged.
    Sort {
        input: Box<LogicalPlan>,
        key: String,
        ascending: bool,
    },

    Limit {
        input: Box<LogicalPlan>,
        limit: usize,
    },
}

impl LogicalPlan {
    pub fn input(&self) -> Option<&LogicalPlan> {
        match self {
            LogicalPlan::Scan => None,
            LogicalPlan::Scope { input, .. }
            | LogicalPlan::Filter { input, .. }
            | LogicalPlan::Project { input, .. }
            | LogicalPlan::Aggregate { input, .. }
            | LogicalPlan::Sort { input, .. }
            | LogicalPlan::Limit { input, .. } => Some(input),
        }
    }

    /// Node names from the root down to the scan, for logs and tests.
    pub fn describe(&self) -> Vec<&'static str> {
        let mut names = vec![];
        let mut node = Some(self);
        while let Some(plan) = node {
            names.push(match plan {
                LogicalPlan::Scan => "scan",
                LogicalPlan::Scope { .. } => "scope",
                LogicalPlan::Filter { .. } => "filter",
                LogicalPlan::Project { .. } => "project",
                LogicalPlan::Aggregate { .. } => "aggregate",
                LogicalPlan::Sort { .. } => "sort",
                LogicalPlan::Limit { .. } => "limit",
            });
            node = plan.input();
        }
        names
    }
}
