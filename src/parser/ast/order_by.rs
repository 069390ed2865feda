use crate::{database::Catalog, parser::{ast::{Clause, ClauseKind}, ColumnRef, ParseError, ParseErrorKind, QueryParser, Span}};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub ascending: bool,
}

impl OrderBy {
    pub fn direction(&self) -> &'static str {
        if self.ascending { "asc" } else { "desc" }
    }

    /// `order by <field> [asc|desc]`. The label's inner whitespace is
    /// collapsed to single blanks.
    pub fn parse(parser: &mut QueryParser, catalog: &Catalog) -> Result<Self, ParseError> {
        let (keyword, body) = Clause::take(parser, ClauseKind::OrderBy)?;

        let last = (body.start..body.end)
            .rev()
            .find(|pos| parser.text_v[*pos].is_whitespace())
            .map(|pos| pos + 1)
            .unwrap_or(body.start);

        let mut ascending = true;
        let mut column_end = body.end;
        if body.end > last && parser.comparers.desc.compare_at(parser, last) && last + parser.comparers.desc.length == body.end {
            ascending = false;
            column_end = last;
        } else if body.end > last && parser.comparers.asc.compare_at(parser, last) && last + parser.comparers.asc.length == body.end {
            column_end = last;
        }

        let span = parser.trim_span(Span::new(body.start, column_end));
        if span.is_empty() {
            return ParseError::at(ParseErrorKind::UnsupportedClause, "Order by requires a column.", keyword, parser).err();
        }

        let label = parser.text_from_span(span).split_whitespace().collect::<Vec<_>>().join(" ");
        let column = ColumnRef::new(&label, span);
        column.resolve(catalog, &format!("Unknown order by column '{}'", column.label), parser)?;

        Ok(OrderBy { column, ascending })
    }
}
