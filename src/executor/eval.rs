use serde_json::Value;

use crate::{database::{parse_f64, FieldDescriptor, Machine}, parser::{Filter, FilterOp}};

pub struct Eval;

impl Eval {
    /// Exact, case-sensitive match on the machine's group.
    pub fn in_scope(machine: &Machine, group: &str) -> bool {
        machine.group_name.as_deref() == Some(group)
    }

    /// A null field never matches, whatever the operator.
    ///
    /// Text operators compare lower-cased string forms; numeric operators
    /// need both sides to parse as floats.
    pub fn matches(filter: &Filter, machine: &Machine) -> bool {
        let cell = machine.get(filter.field.key);
        if cell.is_null() {
            return false;
        }

        if filter.op.is_numeric() {
            let (Some(left), Some(right)) = (cell.as_f64(), parse_f64(&filter.value)) else {
                return false;
            };
            return match filter.op {
                FilterOp::GreaterThan => left > right,
                _ => left < right,
            };
        }

        let Some(text) = cell.to_text() else { return false };
        let text = text.to_lowercase();
        let target = filter.value.to_lowercase();

        match filter.op {
            FilterOp::Contains => text.contains(&target),
            FilterOp::DoesNotContain => !text.contains(&target),
            FilterOp::Equals => text == target,
            FilterOp::StartsWith => text.starts_with(&target),
            FilterOp::GreaterThan | FilterOp::LessThan => false,
        }
    }

    /// Output cell of a plain table.
    pub fn cell(machine: &Machine, field: &FieldDescriptor) -> Value {
        machine.get(field.key).to_display_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{database::{Catalog, FieldKey}, parser::Span};
    use serde_json::json;

    fn filter(label: &str, op: FilterOp, value: &str) -> Filter {
        Filter {
            field: *Catalog::standard().field(label).unwrap(),
            label: label.to_string(),
            op,
            value: value.to_string(),
            span: Span::new(0, 0),
        }
    }

    fn machine() -> Machine {
        Machine {
            computer_name: Some("MAC-FIN-02".into()),
            os_platform: Some("macOS".into()),
            os_version: Some("13.6".into()),
            group_name: Some("Finance Workstations".into()),
            memory_gb: Some(16.0),
            cpu_percent: Some(26.1),
            ..Default::default()
        }
    }

    #[test]
    fn text_operators_ignore_case() {
        let m = machine();
        assert!(Eval::matches(&filter("os platform", FilterOp::Equals, "MACOS"), &m));
        assert!(Eval::matches(&filter("computer name", FilterOp::StartsWith, "mac-"), &m));
        assert!(Eval::matches(&filter("group", FilterOp::Contains, "finance"), &m));
        assert!(!Eval::matches(&filter("group", FilterOp::DoesNotContain, "FINANCE"), &m));
    }

    #[test]
    fn numeric_fields_use_their_text_form_for_text_operators() {
        let m = machine();
        assert!(Eval::matches(&filter("memory gb", FilterOp::Contains, "16"), &m));
        assert!(Eval::matches(&filter("memory gb", FilterOp::Equals, "16.0"), &m));
        assert!(!Eval::matches(&filter("memory gb", FilterOp::Equals, "16"), &m));
    }

    #[test]
    fn numeric_operators_coerce_both_sides() {
        let m = machine();
        assert!(Eval::matches(&filter("cpu percent", FilterOp::GreaterThan, " 20 "), &m));
        assert!(!Eval::matches(&filter("cpu percent", FilterOp::LessThan, "20"), &m));
        assert!(Eval::matches(&filter("os version", FilterOp::GreaterThan, "13"), &m));
    }

    #[test]
    fn numeric_operators_never_match_non_numbers() {
        let m = machine();
        assert!(!Eval::matches(&filter("cpu percent", FilterOp::GreaterThan, "twenty"), &m));
        assert!(!Eval::matches(&filter("os platform", FilterOp::GreaterThan, "1"), &m));
        assert!(!Eval::matches(&filter("os platform", FilterOp::LessThan, "1"), &m));
    }

    #[test]
    fn null_never_matches() {
        let m = machine();
        assert!(!Eval::matches(&filter("location", FilterOp::DoesNotContain, "EU"), &m));
        assert!(!Eval::matches(&filter("disk free gb", FilterOp::LessThan, "1000"), &m));
    }

    #[test]
    fn scope_is_case_sensitive() {
        let m = machine();
        assert!(Eval::in_scope(&m, "Finance Workstations"));
        assert!(!Eval::in_scope(&m, "finance workstations"));
        assert!(!Eval::in_scope(&Machine::default(), "Laptops"));
    }

    #[test]
    fn cells_round_numbers_and_keep_nulls() {
        let m = Machine { compliance_score: Some(0.87654), ..machine() };
        let catalog = Catalog::standard();

        assert_eq!(Eval::cell(&m, catalog.field("compliance score").unwrap()), json!(0.877));
        assert_eq!(Eval::cell(&m, catalog.field("location").unwrap()), Value::Null);
        assert_eq!(Eval::cell(&m, &FieldDescriptor::text(FieldKey::ComputerName)), json!("MAC-FIN-02"));
    }
}
