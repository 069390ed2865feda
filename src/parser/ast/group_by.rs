use crate::{database::Catalog, parser::{ast::{Clause, ClauseKind}, ColumnRef, ParseError, ParseErrorKind, QueryParser, Span}};

/// `group by <field>`; `span` covers the keyword and the column.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByClause {
    pub column: ColumnRef,
    pub span: Span,
}

pub struct GroupBy;

impl GroupBy {
    pub fn parse(parser: &mut QueryParser, catalog: &Catalog) -> Result<GroupByClause, ParseError> {
        let (keyword, body) = Clause::take(parser, ClauseKind::GroupBy)?;
        if body.is_empty() {
            return ParseError::at(ParseErrorKind::UnsupportedClause, "Group by requires a column.", keyword, parser).err();
        }

        let column = ColumnRef::from_span(parser, body);
        column.resolve(catalog, &format!("Unknown group by column '{}'", column.label), parser)?;

        Ok(GroupByClause { column, span: Span::new(keyword.start, body.end) })
    }
}

#[cfg(test)]
mod tests {
    use crate::{database::Catalog, parser::{ast::GroupBy, ParseErrorKind, QueryParser, Span}};

    #[test]
    pub fn test_group_by() {
        let text = "group by OS Platform  limit 3";

        let mut parser = QueryParser::new(text);

        let result = GroupBy::parse(&mut parser, Catalog::standard()).expect("Failed to parse group by");

        assert_eq!(result.column.label, "OS Platform");
        assert_eq!(result.column.span, Span::new(9, 20));
        assert_eq!(result.span, Span::new(0, 20));
        assert_eq!(parser.position, 22);
    }

    #[test]
    pub fn test_group_by_unknown_column() {
        let mut parser = QueryParser::new("GROUP BY platform");

        let result = GroupBy::parse(&mut parser, Catalog::standard());

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.kind, ParseErrorKind::UnknownField);
                assert_eq!(err.message, "Unknown group by column 'platform'");
                assert_eq!(err.text, "platform");
                assert_eq!(err.start, 9);
            },
        }
    }

    #[test]
    pub fn test_group_by_without_column() {
        let mut parser = QueryParser::new("group by  limit 3");

        let result = GroupBy::parse(&mut parser, Catalog::standard());

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.message, "Group by requires a column.");
                assert_eq!(err.text, "group by");
            },
        }
    }
}
