use crate::{database::Catalog, parser::{AggregateCall, AggregateFunc, ColumnRef, ParseError, ParseErrorKind, QueryParser, Span}};

/// Output of the column segment: plain columns and aggregations, each in
/// the order they were written.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Projection {
    pub columns: Vec<ColumnRef>,
    pub aggregations: Vec<AggregateCall>,
}

pub struct ProjectionParser;

impl ProjectionParser {
    pub fn is_projection_end(parser: &QueryParser) -> bool {
        parser.comparers.from.compare(parser)
    }

    /// Reads the column list from the cursor up to ` from `.
    ///
    /// Items are separated by commas or by the word `and` surrounded by
    /// single blanks. The cursor is left on the blank that opens ` from `.
    pub fn parse(parser: &mut QueryParser, catalog: &Catalog) -> Result<Projection, ParseError> {
        let mut items: Vec<Span> = vec![];
        let mut pivot = parser.position;

        while !parser.eof() && !Self::is_projection_end(parser) {
            if parser.current() == ',' {
                items.push(Span::new(pivot, parser.position));
                parser.next();
                pivot = parser.position;
                continue;
            }

            if parser.comparers.and.compare(parser) {
                items.push(Span::new(pivot, parser.position));
                // the closing blank of ` and ` may open ` from `
                parser.jump(parser.comparers.and.length - 1);
                if Self::is_projection_end(parser) {
                    pivot = parser.position;
                    break;
                }
                parser.next();
                pivot = parser.position;
                continue;
            }

            parser.next();
        }

        if parser.eof() {
            return ParseError::at(
                ParseErrorKind::MalformedQuery,
                "Include a scope using 'from'.",
                Span::new(parser.start, parser.start + 3),
                parser,
            ).err();
        }
        items.push(Span::new(pivot, parser.position));

        let mut projection = Projection::default();
        for span in items.into_iter().map(|s| parser.trim_span(s)).filter(|s| !s.is_empty()) {
            match Self::parse_aggregate(parser, span) {
                Some(call) => {
                    if let Some(target) = &call.target {
                        let message = match call.func {
                            AggregateFunc::Count => format!("Unknown count column '{}'", target.label),
                            _ => format!("Unknown aggregation column '{}'", target.label),
                        };
                        target.resolve(catalog, &message, parser)?;
                    }
                    projection.aggregations.push(call);
                },
                None => {
                    let column = ColumnRef::from_span(parser, span);
                    column.resolve(catalog, &format!("Unknown field '{}'", column.label), parser)?;
                    projection.columns.push(column);
                },
            }
        }

        Ok(projection)
    }

    /// `count()`, `count(x)`, `avg(x)`, ... with a case-insensitive name.
    /// Anything else is a plain column.
    fn parse_aggregate(parser: &QueryParser, span: Span) -> Option<AggregateCall> {
        let lowered = parser.text_from_span(span).to_lowercase();
        if !lowered.ends_with(')') {
            return None;
        }

        let func = AggregateFunc::ALL
            .iter()
            .copied()
            .find(|func| lowered.starts_with(&format!("{}(", func.name())))?;

        let open = span.start + func.name().len();
        let inner = parser.trim_span(Span::new(open + 1, span.end - 1));
        let target = (!inner.is_empty()).then(|| ColumnRef::from_span(parser, inner));

        Some(AggregateCall::new(func, target))
    }
}
