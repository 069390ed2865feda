use std::{fs, path::PathBuf, sync::Arc};

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    database::{Catalog, EngineConfig, InventorySource, MemoryInventory, SavedQueryStore},
    error::{EngineError, Result},
    executor::{plan_executor::{Executor, PlanExecutor}, result::QueryResult},
    parser::ParsedQuery,
    planner::plan_builder::PlanBuilder,
};

/// One request against the engine, as the command line expresses it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    pub question: Option<String>,
    /// Save the question under this name once it evaluates.
    pub save: Option<String>,
    /// Evaluate a saved question instead of `question`.
    pub run_saved: Option<String>,
    pub list_saved: bool,
    /// Attach a CSV rendering of the table.
    pub csv: bool,
    /// Also write the payload here; relative paths go under the downloads dir.
    pub out_file: Option<PathBuf>,
}

/// The engine: catalog, inventory and saved-question registry behind one handle.
pub struct Db {
    catalog: Catalog,
    inventory: Arc<dyn InventorySource>,
    saved: SavedQueryStore,
    config: EngineConfig,
}

impl Db {
    pub fn new(config: EngineConfig, inventory: Arc<dyn InventorySource>) -> Self {
        Self {
            catalog: config.catalog(),
            saved: SavedQueryStore::new(config.saved_path.clone()),
            inventory,
            config,
        }
    }

    /// Reads `inventory_path` when set, otherwise seeds the sample machines.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let inventory = match &config.inventory_path {
            Some(path) => {
                let inventory = MemoryInventory::new();
                inventory.load_from_file(path)?;
                inventory
            }
            None => MemoryInventory::sample(),
        };
        Ok(Self::new(config, Arc::new(inventory)))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn saved_queries(&self) -> &SavedQueryStore {
        &self.saved
    }

    /// Runs an invocation to a JSON payload. Never fails: errors become
    /// `{ok: false, ...}` payloads.
    pub fn invoke(&self, invocation: &Invocation) -> Value {
        if invocation.list_saved {
            return json!({ "ok": true, "saved": self.saved.list() });
        }

        let question = match &invocation.run_saved {
            Some(name) => match self.saved.find(name) {
                Some(saved) => saved.question,
                None => return json!({ "ok": false, "error": format!("No saved question named '{}'.", name) }),
            },
            None => match invocation.question.as_deref().map(str::trim) {
                Some(q) if !q.is_empty() => invocation.question.clone().unwrap_or_default(),
                _ => return json!({ "ok": false, "error": "Provide a question with -q." }),
            },
        };

        match self.run_invocation(&question, invocation) {
            Ok(payload) => payload,
            Err(err) => Self::failure(&question, &err),
        }
    }

    fn run_invocation(&self, question: &str, invocation: &Invocation) -> Result<Value> {
        let mut result = self.ask(question)?;

        if let Some(name) = &invocation.save {
            result.saved = Some(self.saved.upsert(name, question)?);
        }
        if invocation.csv {
            result.csv = Some(result.to_csv());
        }
        if let Some(path) = &invocation.out_file {
            let out_path = self.config.resolve_output_path(path);
            if let Some(parent) = out_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&out_path, serde_json::to_string_pretty(&result)?)?;
            info!(path = %out_path.display(), "wrote result file");
            result.output_file = Some(out_path.display().to_string());
        }

        Ok(serde_json::to_value(result)?)
    }

    /// `error_pos` is the start offset of question errors and null otherwise.
    pub fn failure(question: &str, err: &EngineError) -> Value {
        let error = if err.is_query_error() { err.to_string() } else { format!("Simulator failure: {err}") };
        json!({
            "ok": false,
            "error": error,
            "error_pos": err.position(),
            "question": question,
        })
    }
}

pub trait DbRunner {
    /// Parse, plan, and execute a question against the inventory.
    fn ask(&self, question: &str) -> Result<QueryResult>;
}

impl DbRunner for Db {
    fn ask(&self, question: &str) -> Result<QueryResult> {
        // 1) Parse
        let parsed = ParsedQuery::parse_with(question, &self.catalog)?;

        // 2) Plan
        let plan = PlanBuilder::from_parsed(&parsed, &self.catalog, &self.config.default_column)?;

        // 3) Execute
        let execution = PlanExecutor::new(plan).execute(self.inventory.as_ref())?;

        debug!(rows = execution.rows.len(), "answered question");
        Ok(QueryResult::new(question, &parsed, execution))
    }
}
