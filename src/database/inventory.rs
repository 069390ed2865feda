use std::{fs, path::Path, sync::RwLock};

use serde_json::Value;
use tracing::{debug, info};

use crate::{database::Machine, error::{EngineError, Result}};

/// Read-only source of machine rows.
pub trait InventorySource: Send + Sync {
    /// One full read of the inventory.
    fn load_rows(&self) -> Result<Vec<Machine>>;
}

type SampleRow = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, f64, f64, f64, f64, &'static str, &'static str);

const SAMPLE_ROWS: [SampleRow; 11] = [
    ("LAPTOP-001", "Workstation", "Windows 11", "22H2", "Laptops", "NA-US", 68.2, 16.0, 32.5, 0.87, "2024-05-18", "2024-05-20"),
    ("LAPTOP-002", "Workstation", "Windows 10", "21H2", "Laptops", "NA-US", 45.4, 8.0, 74.3, 0.62, "2024-05-16", "2024-05-19"),
    ("LAPTOP-003", "Workstation", "Windows 11", "23H1", "Finance Workstations", "NA-US", 120.1, 16.0, 18.9, 0.92, "2024-05-14", "2024-05-18"),
    ("SERVER-API-01", "Server", "Windows Server 2019", "2019", "Data Center Servers", "NA-US", 512.4, 64.0, 42.1, 0.95, "2024-05-12", "2024-05-17"),
    ("SERVER-SQL-01", "Server", "Windows Server 2022", "2022", "Data Center Servers", "NA-US", 312.9, 128.0, 55.3, 0.89, "2024-05-13", "2024-05-17"),
    ("SRV-LNX-01", "Server", "Linux", "RHEL 9", "Data Center Servers", "EU-DE", 212.5, 32.0, 21.7, 0.91, "2024-05-11", "2024-05-15"),
    ("MAC-OPS-01", "Workstation", "macOS", "14.4", "Operations", "NA-US", 180.7, 32.0, 23.4, 0.88, "2024-05-18", "2024-05-20"),
    ("MAC-FIN-02", "Workstation", "macOS", "13.6", "Finance Workstations", "NA-US", 102.6, 16.0, 26.1, 0.93, "2024-05-15", "2024-05-18"),
    ("ENG-LAB-01", "Workstation", "Windows 11", "22H2", "Engineering Lab", "NA-US", 250.8, 32.0, 65.2, 0.77, "2024-05-15", "2024-05-18"),
    ("ENG-LAB-02", "Workstation", "Windows 11", "22H2", "Engineering Lab", "NA-US", 198.4, 32.0, 58.4, 0.75, "2024-05-15", "2024-05-18"),
    ("CANARY-EDGE", "Workstation", "Windows 11", "23H1", "Canary Cohort", "NA-US", 156.4, 16.0, 12.4, 0.98, "2024-05-19", "2024-05-20"),
];

/// The eleven demo machines used when no inventory file is configured.
pub fn sample_machines() -> Vec<Machine> {
    SAMPLE_ROWS
        .iter()
        .map(|row| Machine {
            computer_name: Some(row.0.to_string()),
            role: Some(row.1.to_string()),
            os_platform: Some(row.2.to_string()),
            os_version: Some(row.3.to_string()),
            group_name: Some(row.4.to_string()),
            location: Some(row.5.to_string()),
            disk_free_gb: Some(row.6),
            memory_gb: Some(row.7),
            cpu_percent: Some(row.8),
            compliance_score: Some(row.9),
            last_reboot: Some(row.10.to_string()),
            last_seen: Some(row.11.to_string()),
        })
        .collect()
}

/// In-memory inventory protected by a `RwLock`.
///
/// Readers get a full copy of the rows, so evaluation never holds the lock.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    rows: RwLock<Vec<Machine>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Machine>) -> Self {
        Self { rows: RwLock::new(rows) }
    }

    pub fn sample() -> Self {
        Self::from_rows(sample_machines())
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_batch(&self, machines: Vec<Machine>) -> Result<usize> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;
        let added = machines.len();
        rows.extend(machines);
        Ok(added)
    }

    pub fn clear(&self) -> Result<()> {
        self.rows.write().map_err(|_| Self::poisoned())?.clear();
        Ok(())
    }

    /// Loads a JSON array of machine records; `keep` appends to the
    /// current rows instead of replacing them.
    pub fn load_from_json(&self, json_value: Value, keep: bool) -> Result<usize> {
        let Value::Array(_) = json_value else {
            return Err(EngineError::Inventory("inventory JSON does not contain an array in the root".into()));
        };
        let machines: Vec<Machine> = serde_json::from_value(json_value)?;

        if !keep {
            self.clear()?;
        }
        self.add_batch(machines)
    }

    pub fn load_from_file(&self, file_path: &Path) -> Result<usize> {
        let file_content = fs::read_to_string(file_path)?;
        let json_value = serde_json::from_str::<Value>(&file_content)?;

        let added = self.load_from_json(json_value, false)?;
        info!(path = %file_path.display(), machines = added, "loaded inventory");
        Ok(added)
    }

    fn poisoned() -> EngineError {
        EngineError::Inventory("inventory lock poisoned".into())
    }
}

impl InventorySource for MemoryInventory {
    fn load_rows(&self) -> Result<Vec<Machine>> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        debug!(rows = rows.len(), "inventory read");
        Ok(rows.clone())
    }
}
