use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::database::FieldKey;

/// Value type of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Number,
}

/// Catalog entry: where a label points and how its values behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub value_type: ValueType,
}

impl FieldDescriptor {
    pub const fn text(key: FieldKey) -> Self {
        Self { key, value_type: ValueType::Text }
    }

    pub const fn number(key: FieldKey) -> Self {
        Self { key, value_type: ValueType::Number }
    }

    pub fn is_number(&self) -> bool {
        self.value_type == ValueType::Number
    }
}

const DEFAULT_FIELDS: [(&str, FieldDescriptor); 15] = [
    ("computer name", FieldDescriptor::text(FieldKey::ComputerName)),
    ("computer role", FieldDescriptor::text(FieldKey::Role)),
    ("role", FieldDescriptor::text(FieldKey::Role)),
    ("operating system", FieldDescriptor::text(FieldKey::OsPlatform)),
    ("os platform", FieldDescriptor::text(FieldKey::OsPlatform)),
    ("os version", FieldDescriptor::text(FieldKey::OsVersion)),
    ("disk free gb", FieldDescriptor::number(FieldKey::DiskFreeGb)),
    ("memory gb", FieldDescriptor::number(FieldKey::MemoryGb)),
    ("cpu percent", FieldDescriptor::number(FieldKey::CpuPercent)),
    ("compliance score", FieldDescriptor::number(FieldKey::ComplianceScore)),
    ("group", FieldDescriptor::text(FieldKey::GroupName)),
    ("group name", FieldDescriptor::text(FieldKey::GroupName)),
    ("location", FieldDescriptor::text(FieldKey::Location)),
    ("last reboot", FieldDescriptor::text(FieldKey::LastReboot)),
    ("last seen", FieldDescriptor::text(FieldKey::LastSeen)),
];

const DEFAULT_GROUP_ALIASES: [(&str, &str); 6] = [
    ("laptops", "Laptops"),
    ("servers", "Data Center Servers"),
    ("finance", "Finance Workstations"),
    ("finance workstations", "Finance Workstations"),
    ("canary", "Canary Cohort"),
    ("engineering lab", "Engineering Lab"),
];

static STANDARD: Lazy<Catalog> = Lazy::new(Catalog::build_standard);

/// Label -> field table plus the group alias table.
///
/// Lookups are case-insensitive: keys are stored lower-cased and the
/// incoming label is trimmed and lower-cased before the lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    fields: IndexMap<String, FieldDescriptor>,
    group_aliases: IndexMap<String, String>,
}

impl Catalog {
    pub fn new(fields: IndexMap<String, FieldDescriptor>, group_aliases: IndexMap<String, String>) -> Self {
        Self {
            fields: fields.into_iter().map(|(k, v)| (Self::normalize(&k), v)).collect(),
            group_aliases: group_aliases.into_iter().map(|(k, v)| (Self::normalize(&k), v)).collect(),
        }
    }

    /// The process-wide catalog of the endpoint inventory.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    fn build_standard() -> Catalog {
        Catalog::new(
            DEFAULT_FIELDS.iter().map(|(label, desc)| (label.to_string(), *desc)).collect(),
            DEFAULT_GROUP_ALIASES.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        )
    }

    /// Copy of this catalog with extra group aliases layered on top.
    pub fn with_group_aliases<I, K, V>(&self, extra: I) -> Catalog
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut catalog = self.clone();
        for (alias, group) in extra {
            catalog.group_aliases.insert(Self::normalize(alias.as_ref()), group.into());
        }
        catalog
    }

    fn normalize(label: &str) -> String {
        label.trim().to_lowercase()
    }

    pub fn field(&self, label: &str) -> Option<&FieldDescriptor> {
        self.fields.get(&Self::normalize(label))
    }

    /// Canonical group name for `name`, or `name` itself when unaliased.
    pub fn resolve_group(&self, name: &str) -> String {
        self.group_aliases
            .get(&Self::normalize(name))
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        let catalog = Catalog::standard();
        let desc = catalog.field("  CPU Percent ").unwrap();
        assert_eq!(desc.key, FieldKey::CpuPercent);
        assert!(desc.is_number());
        assert!(catalog.field("cpu").is_none());
    }

    #[test]
    fn synonyms_share_a_key() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.field("operating system").unwrap().key, FieldKey::OsPlatform);
        assert_eq!(catalog.field("os platform").unwrap().key, FieldKey::OsPlatform);
        assert_eq!(catalog.field("group").unwrap().key, catalog.field("group name").unwrap().key);
    }

    #[test]
    fn group_aliases_resolve_or_pass_through() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.resolve_group("FINANCE"), "Finance Workstations");
        assert_eq!(catalog.resolve_group("Operations"), "Operations");
    }

    #[test]
    fn extra_aliases_layer_over_defaults() {
        let catalog = Catalog::standard().with_group_aliases([("Ops", "Operations"), ("laptops", "Field Laptops")]);
        assert_eq!(catalog.resolve_group("ops"), "Operations");
        assert_eq!(catalog.resolve_group("Laptops"), "Field Laptops");
        assert_eq!(Catalog::standard().resolve_group("laptops"), "Laptops");
    }
}
