use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{database::SavedQuery, executor::plan_executor::{Execution, ExecutionStats}, parser::{ParsedQuery, Warning}};

/// Echo of the parsed question that accompanies every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    pub aggregations: Vec<String>,
    pub group_by: Option<String>,
    pub order_by: Option<String>,
    pub order_dir: String,
    pub limit: Option<usize>,
    pub scope: String,
}

impl From<&ParsedQuery> for QueryMetadata {
    fn from(query: &ParsedQuery) -> Self {
        Self {
            aggregations: query.aggregations.iter().map(|a| a.func.name().to_string()).collect(),
            group_by: query.group_by.as_ref().map(|g| g.column.label.clone()),
            order_by: query.order_by.as_ref().map(|o| o.column.label.clone()),
            order_dir: query.order_dir().to_string(),
            limit: query.limit,
            scope: query.scope.label(),
        }
    }
}

/// Success payload of one evaluated question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub ok: bool,
    pub question: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub row_count: usize,
    pub execution: ExecutionStats,
    pub warnings: Vec<Warning>,
    pub metadata: QueryMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved: Option<SavedQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

impl QueryResult {
    pub fn new(question: &str, query: &ParsedQuery, execution: Execution) -> Self {
        Self {
            ok: true,
            question: question.to_string(),
            row_count: execution.rows.len(),
            headers: execution.headers,
            rows: execution.rows,
            execution: execution.stats,
            warnings: query.warnings.clone(),
            metadata: QueryMetadata::from(query),
            saved: None,
            csv: None,
            output_file: None,
        }
    }

    pub fn to_csv(&self) -> String {
        to_csv(&self.headers, &self.rows)
    }
}

/// Header line then one line per row, each ending in CRLF.
pub fn to_csv(headers: &[String], rows: &[Vec<Value>]) -> String {
    let mut out = String::new();
    write_record(&mut out, headers.iter().cloned());
    for row in rows {
        write_record(&mut out, row.iter().map(csv_text));
    }
    out
}

fn write_record(out: &mut String, fields: impl Iterator<Item = String>) {
    let line = fields.map(|f| quote_field(&f)).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

fn csv_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
