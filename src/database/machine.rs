use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Internal key of a machine attribute.
///
/// Every entry of the field catalog points at one of these keys, and
/// `Machine::get` is the single accessor that turns a key into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    ComputerName,
    Role,
    OsPlatform,
    OsVersion,
    GroupName,
    Location,
    DiskFreeGb,
    MemoryGb,
    CpuPercent,
    ComplianceScore,
    LastReboot,
    LastSeen,
}

impl FieldKey {
    /// Column name used by the inventory store.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::ComputerName => "computer_name",
            FieldKey::Role => "role",
            FieldKey::OsPlatform => "os_platform",
            FieldKey::OsVersion => "os_version",
            FieldKey::GroupName => "group_name",
            FieldKey::Location => "location",
            FieldKey::DiskFreeGb => "disk_free_gb",
            FieldKey::MemoryGb => "memory_gb",
            FieldKey::CpuPercent => "cpu_percent",
            FieldKey::ComplianceScore => "compliance_score",
            FieldKey::LastReboot => "last_reboot",
            FieldKey::LastSeen => "last_seen",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One machine of the inventory.
///
/// Rows are read-only for the query engine: they are loaded from the
/// inventory collaborator and only ever borrowed during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub computer_name: Option<String>,
    pub role: Option<String>,
    pub os_platform: Option<String>,
    pub os_version: Option<String>,
    pub group_name: Option<String>,
    pub location: Option<String>,
    pub disk_free_gb: Option<f64>,
    pub memory_gb: Option<f64>,
    pub cpu_percent: Option<f64>,
    pub compliance_score: Option<f64>,
    pub last_reboot: Option<String>,
    pub last_seen: Option<String>,
}

impl Machine {
    pub fn get(&self, key: FieldKey) -> CellValue<'_> {
        match key {
            FieldKey::ComputerName => CellValue::text(&self.computer_name),
            FieldKey::Role => CellValue::text(&self.role),
            FieldKey::OsPlatform => CellValue::text(&self.os_platform),
            FieldKey::OsVersion => CellValue::text(&self.os_version),
            FieldKey::GroupName => CellValue::text(&self.group_name),
            FieldKey::Location => CellValue::text(&self.location),
            FieldKey::DiskFreeGb => CellValue::number(self.disk_free_gb),
            FieldKey::MemoryGb => CellValue::number(self.memory_gb),
            FieldKey::CpuPercent => CellValue::number(self.cpu_percent),
            FieldKey::ComplianceScore => CellValue::number(self.compliance_score),
            FieldKey::LastReboot => CellValue::text(&self.last_reboot),
            FieldKey::LastSeen => CellValue::text(&self.last_seen),
        }
    }
}

/// Borrowed view of a single attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
    Null,
}

impl<'a> CellValue<'a> {
    fn text(value: &'a Option<String>) -> Self {
        value.as_deref().map_or(CellValue::Null, CellValue::Text)
    }

    fn number(value: Option<f64>) -> Self {
        value.map_or(CellValue::Null, CellValue::Number)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// String form used by the text operators and by group keys.
    ///
    /// Whole numbers keep a trailing `.0` (`16.0`), which is what users of
    /// the inventory see in exports and what `contains "16"` matches against.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some((*s).to_string()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Null => None,
        }
    }

    /// Float coercion; text that does not parse yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_f64(s),
            CellValue::Null => None,
        }
    }

    /// JSON cell for result tables, numbers rounded to 3 decimals.
    pub fn to_display_json(&self) -> Value {
        match self {
            CellValue::Text(s) => Value::String((*s).to_string()),
            CellValue::Number(n) => round_to_json(*n),
            CellValue::Null => Value::Null,
        }
    }
}

pub fn parse_f64(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if n == 0.0 {
        format!("{:.1}", n)
    } else {
        // shortest round-trip digits; exponent form below 1e-4 and from 1e16 up
        let scientific = format!("{:e}", n);
        let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        if !(-4..16).contains(&exponent) {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        } else if n.fract() == 0.0 {
            format!("{:.1}", n)
        } else {
            format!("{}", n)
        }
    }
}

/// Rounds to 3 decimals from the exact binary value, so `1.0005`
/// (stored just below the tie) goes down.
pub fn round3(n: f64) -> f64 {
    if !n.is_finite() {
        return n;
    }
    format!("{:.3}", n).parse().unwrap_or(n)
}

pub fn round_to_json(n: f64) -> Value {
    serde_json::Number::from_f64(round3(n)).map(Value::Number).unwrap_or(Value::Null)
}
