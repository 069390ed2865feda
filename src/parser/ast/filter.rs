use std::fmt;

use serde::Serialize;

use crate::{database::{Catalog, FieldDescriptor}, parser::{ast::{Clause, ClauseKind}, ParseError, ParseErrorKind, QueryParser, Span, Warning}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Contains,
    DoesNotContain,
    Equals,
    StartsWith,
    GreaterThan,
    LessThan,
}

impl FilterOp {
    /// Order in which operator phrases are tried, most specific first.
    pub const BY_SPECIFICITY: [FilterOp; 6] = [
        FilterOp::DoesNotContain,
        FilterOp::Contains,
        FilterOp::StartsWith,
        FilterOp::Equals,
        FilterOp::GreaterThan,
        FilterOp::LessThan,
    ];

    pub fn phrase(&self) -> &'static str {
        match self {
            FilterOp::Contains => "contains",
            FilterOp::DoesNotContain => "does not contain",
            FilterOp::Equals => "equals",
            FilterOp::StartsWith => "starts with",
            FilterOp::GreaterThan => "is greater than",
            FilterOp::LessThan => "is less than",
        }
    }

    pub fn is_containment(&self) -> bool {
        matches!(self, FilterOp::Contains | FilterOp::DoesNotContain)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FilterOp::GreaterThan | FilterOp::LessThan)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.phrase())
    }
}

/// One `<field> <operator> "<value>"` predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: FieldDescriptor,
    pub label: String,
    pub op: FilterOp,
    pub value: String,
    pub span: Span,
}

pub struct FilterParser;

impl FilterParser {
    /// Parses a `with` or `where` clause at the cursor into AND-ed filters.
    pub fn parse(parser: &mut QueryParser, catalog: &Catalog) -> Result<(Vec<Filter>, Vec<Warning>), ParseError> {
        let kind = if parser.comparers.with.compare(parser) { ClauseKind::With } else { ClauseKind::Where };
        let (_, body) = Clause::take(parser, kind)?;
        let body = Self::strip_trailing_dots(parser, body);

        let mut filters = vec![];
        let mut warnings = vec![];
        for predicate in Self::split_predicates(parser, body) {
            let filter = Self::parse_predicate(parser, predicate, catalog)?;
            if filter.op.is_containment() && filter.field.is_number() {
                warnings.push(Warning::new(
                    format!(
                        "Using '{}' with numeric field '{}' may return unexpected results.",
                        filter.op.phrase(),
                        filter.label
                    ),
                    filter.span,
                ));
            }
            filters.push(filter);
        }

        Ok((filters, warnings))
    }

    fn strip_trailing_dots(parser: &QueryParser, body: Span) -> Span {
        let mut end = body.end;
        while end > body.start && parser.text_v[end - 1] == '.' {
            end -= 1;
        }
        Span::new(body.start, end)
    }

    fn skip_whitespace(parser: &QueryParser, mut pos: usize, end: usize) -> usize {
        while pos < end && parser.text_v[pos].is_whitespace() {
            pos += 1;
        }
        pos
    }

    /// Splits on `<blanks>and<blanks>`, any casing. Pieces are trimmed and
    /// empty ones dropped.
    fn split_predicates(parser: &QueryParser, body: Span) -> Vec<Span> {
        let mut pieces = vec![];
        let mut pivot = body.start;
        let mut pos = body.start;

        while pos < body.end {
            if !parser.text_v[pos].is_whitespace() {
                pos += 1;
                continue;
            }

            let word = Self::skip_whitespace(parser, pos, body.end);
            let and = &parser.comparers.and_word;
            if word + and.length < body.end && and.compare_at(parser, word) {
                pieces.push(Span::new(pivot, pos));
                pivot = Self::skip_whitespace(parser, word + and.length, body.end);
                pos = pivot;
                continue;
            }
            pos = word;
        }
        pieces.push(Span::new(pivot, body.end));

        pieces
            .into_iter()
            .map(|piece| parser.trim_span(piece))
            .filter(|piece| !piece.is_empty())
            .collect()
    }

    /// Matches one predicate. The label is the shortest run of ASCII
    /// letters, digits and blanks that is followed by an operator phrase
    /// and a double-quoted value closing the predicate.
    fn parse_predicate(parser: &QueryParser, span: Span, catalog: &Catalog) -> Result<Filter, ParseError> {
        for label_end in span.start + 1..span.end {
            let ch = parser.text_v[label_end - 1];
            if !(ch.is_ascii_alphanumeric() || ch.is_whitespace()) {
                break;
            }
            if !parser.text_v[label_end].is_whitespace() {
                continue;
            }

            let op_start = Self::skip_whitespace(parser, label_end, span.end);
            for (op, comparer) in parser.comparers.operators() {
                if !comparer.compare_at(parser, op_start) {
                    continue;
                }
                let op_end = op_start + comparer.length;
                if op_end >= span.end || !parser.text_v[op_end].is_whitespace() {
                    continue;
                }
                let quote = Self::skip_whitespace(parser, op_end, span.end);
                if let Some(value) = Self::quoted_value(parser, quote, span.end) {
                    let label = parser.trim_span(Span::new(span.start, label_end));
                    return Self::build(parser, catalog, label, *op, value, span);
                }
            }
        }

        let message = format!("Unsupported clause '{}'", parser.text_from_span(span));
        ParseError::at(ParseErrorKind::UnsupportedClause, &message, span, parser).err()
    }

    /// `"..."` from `quote` to exactly `end`, non-empty and without inner quotes.
    fn quoted_value(parser: &QueryParser, quote: usize, end: usize) -> Option<Span> {
        if quote + 3 > end || parser.text_v[quote] != '"' || parser.text_v[end - 1] != '"' {
            return None;
        }
        let value = Span::new(quote + 1, end - 1);
        if value.is_empty() || parser.text_v[value.start..value.end].contains(&'"') {
            return None;
        }
        Some(value)
    }

    fn build(parser: &QueryParser, catalog: &Catalog, label: Span, op: FilterOp, value: Span, span: Span) -> Result<Filter, ParseError> {
        let label_text = parser.text_from_span(label);
        let Some(field) = catalog.field(&label_text) else {
            let message = format!("Unknown field '{}'", label_text);
            return ParseError::at(ParseErrorKind::UnknownField, &message, label, parser).err();
        };

        Ok(Filter {
            field: *field,
            label: label_text,
            op,
            value: parser.text_from_span(value),
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{database::{Catalog, FieldKey}, parser::{Filter, FilterOp, FilterParser, ParseError, ParseErrorKind, QueryParser, Span, Warning}};

    fn parse(text: &str) -> Result<(Vec<Filter>, Vec<Warning>), ParseError> {
        let mut parser = QueryParser::new(text);
        FilterParser::parse(&mut parser, Catalog::standard())
    }

    #[test]
    pub fn test_filter_single() {
        let (filters, warnings) = parse("with CPU Percent is greater than \"20\"").expect("Failed to parse filter");

        assert_eq!(filters.len(), 1);
        assert!(warnings.is_empty());
        assert_eq!(filters[0].field.key, FieldKey::CpuPercent);
        assert_eq!(filters[0].label, "CPU Percent");
        assert_eq!(filters[0].op, FilterOp::GreaterThan);
        assert_eq!(filters[0].value, "20");
        assert_eq!(filters[0].span, Span::new(5, 37));
    }

    #[test]
    pub fn test_filter_and_split_any_case() {
        let text = "where role equals \"Server\"  AND\tos platform starts with \"Windows\" and location does not contain \"EU\".";
        let (filters, _) = parse(text).expect("Failed to parse filter");

        let ops: Vec<FilterOp> = filters.iter().map(|f| f.op).collect();
        assert_eq!(ops, vec![FilterOp::Equals, FilterOp::StartsWith, FilterOp::DoesNotContain]);
        assert_eq!(filters[2].value, "EU");
        assert_eq!(filters[1].label, "os platform");
    }

    #[test]
    pub fn test_filter_value_keeps_spaces_and_and() {
        let (filters, _) = parse("with group equals \"Finance Workstations\"").expect("Failed to parse filter");

        assert_eq!(filters[0].value, "Finance Workstations");
        assert_eq!(filters[0].field.key, FieldKey::GroupName);
    }

    #[test]
    pub fn test_filter_contains_on_number_warns() {
        let (filters, warnings) = parse("with memory gb contains \"16\"").expect("Failed to parse filter");

        assert_eq!(filters.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].message,
            "Using 'contains' with numeric field 'memory gb' may return unexpected results."
        );
        assert_eq!((warnings[0].start, warnings[0].end), (5, 28));
    }

    #[test]
    pub fn test_filter_unknown_field() {
        let result = parse("with uptime is greater than \"3\"");

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.kind, ParseErrorKind::UnknownField);
                assert_eq!(err.message, "Unknown field 'uptime'");
                assert_eq!((err.start, err.end), (5, 11));
            },
        }
    }

    #[test]
    pub fn test_filter_unquoted_value() {
        let result = parse("with cpu percent is greater than 20");

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.kind, ParseErrorKind::UnsupportedClause);
                assert_eq!(err.message, "Unsupported clause 'cpu percent is greater than 20'");
                assert_eq!(err.start, 5);
            },
        }
    }

    #[test]
    pub fn test_filter_empty_quotes() {
        assert!(parse("with role equals \"\"").is_err());
    }

    #[test]
    pub fn test_filter_empty_body() {
        let mut parser = QueryParser::new("with   order by role");
        let (filters, warnings) = FilterParser::parse(&mut parser, Catalog::standard()).expect("Failed to parse filter");

        assert!(filters.is_empty());
        assert!(warnings.is_empty());
        assert_eq!(parser.position, 7);
    }
}
