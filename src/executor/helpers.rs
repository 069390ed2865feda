use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde_json::Value;

pub struct Helpers;

impl Helpers {
    // NULLS LAST comparator helper (ascending flag)
    pub fn cmp_json_for_sort(a: &Value, b: &Value, ascending: bool) -> Ordering {
        use serde_json::Value::*;
        let ord = match (a, b) {
            (Null, Null) => return Ordering::Equal,
            (Null, _) => return Ordering::Greater,
            (_, Null) => return Ordering::Less,
            (Number(x), Number(y)) => {
                let ax = OrderedFloat(x.as_f64().unwrap_or(f64::NAN));
                let by = OrderedFloat(y.as_f64().unwrap_or(f64::NAN));
                ax.cmp(&by)
            },
            (String(x), String(y)) => x.cmp(y),
            (Bool(x), Bool(y)) => x.cmp(y),
            (lhs, rhs) => Self::type_rank(lhs).cmp(&Self::type_rank(rhs)),
        };
        if ascending { ord } else { ord.reverse() }
    }

    fn type_rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0, Value::Bool(_) => 1, Value::Number(_) => 2, Value::String(_) => 3,
            Value::Array(_) => 4, Value::Object(_) => 5
        }
    }

    /// Index of the header equal to `key`, ignoring case and inner whitespace runs.
    pub fn header_index(headers: &[String], key: &str) -> Option<usize> {
        let key = Self::normalize(key);
        headers.iter().position(|h| Self::normalize(h) == key)
    }

    fn normalize(label: &str) -> String {
        label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::Helpers;
    use serde_json::{json, Value};
    use std::cmp::Ordering::*;

    #[test]
    fn sort_nulls_last_in_ascending_and_descending() {
        let n = Value::Null;
        let z = json!(0);

        // Asc: non-null < null
        assert_eq!(Helpers::cmp_json_for_sort(&z, &n, true), Less);
        assert_eq!(Helpers::cmp_json_for_sort(&n, &z, true), Greater);
        assert_eq!(Helpers::cmp_json_for_sort(&n, &n, true), Equal);

        // Desc: still NULLS LAST
        assert_eq!(Helpers::cmp_json_for_sort(&z, &n, false), Less);
        assert_eq!(Helpers::cmp_json_for_sort(&n, &z, false), Greater);
        assert_eq!(Helpers::cmp_json_for_sort(&n, &n, false), Equal);
    }

    #[test]
    fn sort_numbers_respects_ascending_and_descending() {
        let a = json!(1.5);
        let b = json!(2);
        assert_eq!(Helpers::cmp_json_for_sort(&a, &b, true), Less);
        assert_eq!(Helpers::cmp_json_for_sort(&a, &b, false), Greater);
        assert_eq!(Helpers::cmp_json_for_sort(&a, &a, true), Equal);
    }

    #[test]
    fn sort_strings_is_lexicographic_and_directional() {
        let a = json!("ENG-LAB-01");
        let b = json!("LAPTOP-001");
        assert_eq!(Helpers::cmp_json_for_sort(&a, &b, true), Less);
        assert_eq!(Helpers::cmp_json_for_sort(&a, &b, false), Greater);
        assert_eq!(Helpers::cmp_json_for_sort(&a, &a, true), Equal);
    }

    #[test]
    fn mixed_types_order_by_rank() {
        assert_eq!(Helpers::cmp_json_for_sort(&json!(3), &json!("a"), true), Less);
        assert_eq!(Helpers::cmp_json_for_sort(&json!(3), &json!("a"), false), Greater);
    }

    #[test]
    fn header_lookup_ignores_case_and_spacing() {
        let headers = vec!["Computer Name".to_string(), "CPU  Percent".to_string()];

        assert_eq!(Helpers::header_index(&headers, "cpu percent"), Some(1));
        assert_eq!(Helpers::header_index(&headers, "COMPUTER NAME"), Some(0));
        assert_eq!(Helpers::header_index(&headers, "memory gb"), None);
    }
}
