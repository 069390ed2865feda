// Get <columns> from <scope> [with|where <filters>] [group by <field>]
//     [order by <field> [asc|desc]] [limit <n>]

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::{database::Catalog, parser::{ast::{Clause, ClauseKind, FilterParser, GroupBy, GroupByClause, LimitParser, OrderBy, ProjectionParser, ScopeParser}, AggregateCall, ColumnRef, Filter, ParseError, ParseErrorKind, QueryParser, Scope, Span, Warning}};

/// A question compiled against the field catalog.
#[derive(Default, Clone, PartialEq)]
pub struct ParsedQuery {
    pub columns: Vec<ColumnRef>,
    pub aggregations: Vec<AggregateCall>,
    pub scope: Scope,
    pub filters: Vec<Filter>,
    pub group_by: Option<GroupByClause>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
    pub warnings: Vec<Warning>,
}

impl ParsedQuery {
    pub fn parse(parser: &mut QueryParser, catalog: &Catalog) -> Result<Self, ParseError> {
        parser.next_non_whitespace();

        let pivot = parser.position;
        if !parser.comparers.get.compare(parser) {
            let first_word = (pivot..parser.length)
                .find(|pos| parser.text_v[*pos].is_whitespace())
                .unwrap_or(parser.length);
            return ParseError::at(
                ParseErrorKind::MalformedQuery,
                "Questions must start with 'Get'.",
                Span::new(pivot, first_word.max(pivot + 1)),
                parser,
            ).err();
        }
        // stay on the blank after `get`: it may open ` from `
        parser.jump(parser.comparers.get.length - 1);

        let mut query = ParsedQuery::default();

        let projection = ProjectionParser::parse(parser, catalog)?;
        query.columns = projection.columns;
        query.aggregations = projection.aggregations;

        query.scope = ScopeParser::parse(parser, catalog, &mut query.warnings)?;

        let mut seen: HashSet<ClauseKind> = HashSet::new();
        while !parser.eof() {
            let Some(kind) = Clause::detect(parser) else {
                return Clause::unsupported(parser).err();
            };

            if !kind.is_repeatable() && !seen.insert(kind) {
                let message = format!("Only one '{}' clause is allowed.", kind.name());
                let keyword = Span::new(parser.position, parser.position + kind.name().chars().count());
                return ParseError::at(ParseErrorKind::UnsupportedClause, &message, keyword, parser).err();
            }

            match kind {
                ClauseKind::GroupBy => query.group_by = Some(GroupBy::parse(parser, catalog)?),
                ClauseKind::OrderBy => query.order_by = Some(OrderBy::parse(parser, catalog)?),
                ClauseKind::Limit => query.limit = Some(LimitParser::parse(parser)?),
                ClauseKind::With | ClauseKind::Where => {
                    let (filters, warnings) = FilterParser::parse(parser, catalog)?;
                    query.filters.extend(filters);
                    query.warnings.extend(warnings);
                },
            }
        }

        query.add_shape_warnings();
        debug!(query = %query, "parsed question");

        Ok(query)
    }

    /// Parses `question` against `catalog`.
    pub fn parse_with(question: &str, catalog: &Catalog) -> Result<Self, ParseError> {
        let mut parser = QueryParser::new(question);
        ParsedQuery::parse(&mut parser, catalog)
    }

    pub fn is_aggregate(&self) -> bool {
        !self.aggregations.is_empty()
    }

    pub fn order_dir(&self) -> &'static str {
        self.order_by.as_ref().map(|o| o.direction()).unwrap_or("asc")
    }

    fn add_shape_warnings(&mut self) {
        if let Some(group_by) = &self.group_by {
            if self.aggregations.is_empty() {
                self.warnings.push(Warning::new(
                    format!("Group by '{}' has no effect without an aggregation.", group_by.column.label),
                    group_by.span,
                ));
            }
        }

        if self.is_aggregate() {
            for column in &self.columns {
                self.warnings.push(Warning::new(
                    format!("Column '{}' is ignored when aggregations are requested.", column.label),
                    column.span,
                ));
            }
        }
    }
}

impl TryFrom<&str> for ParsedQuery {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ParsedQuery::parse_with(value, Catalog::standard())
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.columns.iter().map(|c| c.label.clone()).collect::<Vec<_>>().join(", ");
        let aggs = self.aggregations.iter().map(|a| a.header()).collect::<Vec<_>>().join(", ");
        let filters = self.filters.iter().map(|x| format!("{} {} {:?}", x.label, x.op, x.value)).collect::<Vec<_>>().join(" and ");
        let group = self.group_by.as_ref().map(|g| g.column.label.clone()).unwrap_or_else(|| "None".to_string());
        let order = match &self.order_by {
            Some(o) => format!("{} {}", o.column.label, o.direction()),
            None => "None".to_string(),
        };

        write!(f, "ParsedQuery(columns=[{}], aggregations=[{}], scope={}, filters=[{}], group_by={}, order_by={}, limit={:?})",
               cols, aggs, self.scope, filters, group, order, self.limit)
    }
}

impl fmt::Debug for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{database::{Catalog, FieldKey}, parser::{AggregateFunc, FilterOp, ParseErrorKind, ParsedQuery, ScopeKind}};

    #[test]
    pub fn test_query() {
        let text = r#"
Get Computer Name, CPU Percent from group "Finance" with CPU Percent is greater than "20"
  and role equals "Workstation" order by cpu percent desc limit 5
        "#;

        let query = ParsedQuery::try_from(text).expect("Failed to parse question");

        assert_eq!(query.columns.len(), 2);
        assert_eq!(query.scope.kind, ScopeKind::Group);
        assert_eq!(query.scope.label(), "Finance Workstations");
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[1].field.key, FieldKey::Role);
        assert_eq!(query.order_by.as_ref().unwrap().column.label, "cpu percent");
        assert_eq!(query.order_dir(), "desc");
        assert_eq!(query.limit, Some(5));
        assert!(query.warnings.is_empty());
    }

    #[test]
    pub fn test_query_clauses_in_any_order() {
        let text = "get count() from all limit 3 group by os platform where memory gb is less than \"64\" with role equals \"Server\"";

        let query = ParsedQuery::try_from(text).expect("Failed to parse question");

        assert_eq!(query.limit, Some(3));
        assert_eq!(query.group_by.as_ref().unwrap().column.label, "os platform");
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].op, FilterOp::LessThan);
        assert_eq!(query.aggregations[0].func, AggregateFunc::Count);
    }

    #[test]
    pub fn test_query_empty_column_list_defaults_later() {
        let query = ParsedQuery::try_from("Get from all").expect("Failed to parse question");

        assert!(query.columns.is_empty());
        assert!(query.aggregations.is_empty());
        assert_eq!(query.scope.kind, ScopeKind::All);
    }

    #[test]
    pub fn test_query_must_start_with_get() {
        let result = ParsedQuery::try_from("  Show computer name from all");

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.kind, ParseErrorKind::MalformedQuery);
                assert_eq!(err.message, "Questions must start with 'Get'.");
                assert_eq!(err.start, 2);
                assert_eq!(err.text, "Show");
            },
        }
    }

    #[test]
    pub fn test_query_missing_from_points_at_get() {
        let result = ParsedQuery::try_from(" Get computer name where role equals \"Server\"");

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.message, "Include a scope using 'from'.");
                assert_eq!(err.start, 1);
                assert_eq!(err.text, "Get");
            },
        }
    }

    #[test]
    pub fn test_query_duplicate_limit() {
        let result = ParsedQuery::try_from("Get role from all limit 1 limit 2");

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.kind, ParseErrorKind::UnsupportedClause);
                assert_eq!(err.message, "Only one 'limit' clause is allowed.");
                assert_eq!(err.start, 26);
                assert_eq!(err.text, "limit");
            },
        }
    }

    #[test]
    pub fn test_query_repeated_filters_accumulate() {
        let query = ParsedQuery::try_from("Get role from all with role equals \"Server\" with location starts with \"EU\"")
            .expect("Failed to parse question");

        assert_eq!(query.filters.len(), 2);
    }

    #[test]
    pub fn test_query_shape_warnings() {
        let query = ParsedQuery::try_from("Get computer name from all group by role").expect("Failed to parse question");
        assert_eq!(query.warnings.len(), 1);
        assert_eq!(query.warnings[0].message, "Group by 'role' has no effect without an aggregation.");
        assert_eq!((query.warnings[0].start, query.warnings[0].end), (27, 40));

        let query = ParsedQuery::try_from("Get role, count() from all").expect("Failed to parse question");
        assert_eq!(query.warnings.len(), 1);
        assert_eq!((query.warnings[0].start, query.warnings[0].end), (4, 8));
    }

    #[test]
    pub fn test_query_custom_catalog_aliases() {
        let catalog = Catalog::standard().with_group_aliases([("ops", "Operations")]);

        let query = ParsedQuery::parse_with("Get role from group ops", &catalog).expect("Failed to parse question");

        assert_eq!(query.scope.group_name(), Some("Operations"));
    }
}
