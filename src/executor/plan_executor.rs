use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    database::{InventorySource, Machine},
    error::{EngineError, Result},
    executor::{eval::Eval, helpers::Helpers},
    parser::aggregators_helper::{Accumulator as AggAcc, AggregateRegistry},
    planner::{aggregate_call::ResolvedAggregate, logical_plan::{GroupKey, LogicalPlan, ProjectedColumn}},
};

/// Row counts after the scope and after the filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStats {
    pub scoped: usize,
    pub filtered: usize,
}

/// Final table of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub stats: ExecutionStats,
}

pub trait Executor {
    fn execute(&self, inventory: &dyn InventorySource) -> Result<Execution>;
}

/// Intermediate result: machines before projection, a table after.
enum Relation {
    Rows(Vec<Machine>),
    Table { headers: Vec<String>, rows: Vec<Vec<Value>> },
}

impl Relation {
    fn into_rows(self, node: &str) -> Result<Vec<Machine>> {
        match self {
            Relation::Rows(rows) => Ok(rows),
            Relation::Table { .. } => Err(EngineError::Plan(format!("{node} expects machine rows"))),
        }
    }

    fn into_table(self, node: &str) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
        match self {
            Relation::Table { headers, rows } => Ok((headers, rows)),
            Relation::Rows(_) => Err(EngineError::Plan(format!("{node} expects a projected table"))),
        }
    }
}

type GroupEntry = (Value, Vec<Box<dyn AggAcc>>);

pub struct PlanExecutor {
    plan: LogicalPlan,
}

impl Executor for PlanExecutor {
    fn execute(&self, inventory: &dyn InventorySource) -> Result<Execution> {
        let mut stats = ExecutionStats::default();
        let (headers, rows) = Self::run_plan(&self.plan, inventory, &mut stats)?.into_table("result")?;

        debug!(rows = rows.len(), scoped = stats.scoped, filtered = stats.filtered, "executed plan");
        Ok(Execution { headers, rows, stats })
    }
}

impl PlanExecutor {
    pub fn new(plan: LogicalPlan) -> Self { Self { plan } }

    fn run_plan(plan: &LogicalPlan, inventory: &dyn InventorySource, stats: &mut ExecutionStats) -> Result<Relation> {
        match plan {
            LogicalPlan::Scan => {
                let rows = inventory.load_rows()?;
                stats.scoped = rows.len();
                stats.filtered = rows.len();
                Ok(Relation::Rows(rows))
            }
            LogicalPlan::Scope { input, group } => {
                let rows: Vec<Machine> = Self::run_plan(input, inventory, stats)?
                    .into_rows("scope")?
                    .into_iter()
                    .filter(|m| Eval::in_scope(m, group))
                    .collect();
                stats.scoped = rows.len();
                stats.filtered = rows.len();
                Ok(Relation::Rows(rows))
            }
            LogicalPlan::Filter { input, filter } => {
                let mut rows = Self::run_plan(input, inventory, stats)?.into_rows("filter")?;
                rows.retain(|m| Eval::matches(filter, m));
                stats.filtered = rows.len();
                Ok(Relation::Rows(rows))
            }
            LogicalPlan::Project { input, columns } => {
                let rows = Self::run_plan(input, inventory, stats)?.into_rows("project")?;
                Ok(Self::project_rows(&rows, columns))
            }
            LogicalPlan::Aggregate { input, group_by, aggs } => {
                let rows = Self::run_plan(input, inventory, stats)?.into_rows("aggregate")?;
                Self::aggregate_rows(&rows, group_by.as_ref(), aggs)
            }
            LogicalPlan::Sort { input, key, ascending } => {
                let (headers, mut rows) = Self::run_plan(input, inventory, stats)?.into_table("sort")?;
                // a key that is not an output column leaves the order untouched
                if let Some(idx) = Helpers::header_index(&headers, key) {
                    // stable sort
                    rows.sort_by(|a, b| Helpers::cmp_json_for_sort(&a[idx], &b[idx], *ascending));
                }
                Ok(Relation::Table { headers, rows })
            }
            LogicalPlan::Limit { input, limit } => {
                let (headers, mut rows) = Self::run_plan(input, inventory, stats)?.into_table("limit")?;
                rows.truncate(*limit);
                Ok(Relation::Table { headers, rows })
            }
        }
    }

    fn project_rows(rows: &[Machine], columns: &[ProjectedColumn]) -> Relation {
        let headers = columns.iter().map(|c| c.header.clone()).collect();
        let rows = rows
            .iter()
            .map(|m| columns.iter().map(|c| Eval::cell(m, &c.field)).collect())
            .collect();
        Relation::Table { headers, rows }
    }

    fn aggregate_rows(rows: &[Machine], group_by: Option<&GroupKey>, calls: &[ResolvedAggregate]) -> Result<Relation> {
        let registry = AggregateRegistry::default_aggregate_registry();
        let new_accumulators = || -> Result<Vec<Box<dyn AggAcc>>> {
            calls
                .iter()
                .map(|call| {
                    registry
                        .get(call.func.name())
                        .map(|agg| agg.create_accumulator())
                        .ok_or_else(|| EngineError::UnsupportedAggregate(call.func.name().to_string()))
                })
                .collect()
        };

        // group key -> (key cell, accumulators), first-seen order
        let mut groups: IndexMap<Option<String>, GroupEntry> = IndexMap::new();
        if group_by.is_none() {
            groups.insert(None, (Value::Null, new_accumulators()?));
        }

        for machine in rows {
            let key = group_by.and_then(|g| machine.get(g.field.key).to_text());
            if !groups.contains_key(&key) {
                let cell = key.clone().map(Value::String).unwrap_or(Value::Null);
                groups.insert(key.clone(), (cell, new_accumulators()?));
            }
            let Some((_, accs)) = groups.get_mut(&key) else { continue };

            for (acc, call) in accs.iter_mut().zip(calls) {
                match call.target {
                    Some(field) => acc.update(&[machine.get(field.key)])?,
                    None => acc.update(&[])?,
                }
            }
        }

        let mut headers: Vec<String> = vec![];
        if let Some(g) = group_by {
            headers.push(g.header.clone());
        }
        headers.extend(calls.iter().map(|c| c.header.clone()));

        let out = groups
            .into_values()
            .map(|(cell, accs)| {
                let mut record: Vec<Value> = vec![];
                if group_by.is_some() {
                    record.push(cell);
                }
                record.extend(accs.iter().map(|acc| acc.finalize()));
                record
            })
            .collect();

        Ok(Relation::Table { headers, rows: out })
    }
}
