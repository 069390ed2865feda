use std::fmt;

use crate::parser::{ParseError, ParseErrorKind, QueryParser, Span};

/// Keyword that opens a clause after the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    GroupBy,
    OrderBy,
    Limit,
    With,
    Where,
}

impl ClauseKind {
    pub const ALL: [ClauseKind; 5] = [
        ClauseKind::GroupBy,
        ClauseKind::OrderBy,
        ClauseKind::Limit,
        ClauseKind::With,
        ClauseKind::Where,
    ];

    /// Keyword including its trailing blank.
    pub fn keyword(&self) -> &'static str {
        match self {
            ClauseKind::GroupBy => "group by ",
            ClauseKind::OrderBy => "order by ",
            ClauseKind::Limit => "limit ",
            ClauseKind::With => "with ",
            ClauseKind::Where => "where ",
        }
    }

    pub fn name(&self) -> &'static str {
        self.keyword().trim_end()
    }

    /// Filter clauses may appear any number of times; the rest only once.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, ClauseKind::With | ClauseKind::Where)
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub struct Clause;

impl Clause {
    /// Which clause keyword, if any, starts at the cursor.
    pub fn detect(parser: &QueryParser) -> Option<ClauseKind> {
        ClauseKind::ALL
            .iter()
            .copied()
            .find(|kind| parser.comparers.clause(*kind).compare(parser))
    }

    /// Error for tail text that opens with no known keyword.
    pub fn unsupported(parser: &QueryParser) -> ParseError {
        let near: String = parser.text_from_range(parser.position, parser.length).chars().take(20).collect();
        ParseError::at(
            ParseErrorKind::UnsupportedClause,
            &format!("Unsupported clause near '{}'", near),
            Span::new(parser.position, parser.length),
            parser,
        )
    }

    /// Consumes the `kind` keyword at the cursor and the body after it.
    ///
    /// Returns the keyword span (without the trailing blank) and the trimmed
    /// body span. The body runs up to the leftmost following clause keyword,
    /// where the cursor is left, or to the end of the question.
    pub fn take(parser: &mut QueryParser, kind: ClauseKind) -> Result<(Span, Span), ParseError> {
        let comparer = parser.comparers.clause(kind);
        if !comparer.compare(parser) {
            let message = format!("Invalid {}", kind.name());
            return ParseError::new(ParseErrorKind::UnsupportedClause, &message, parser.position, parser).err();
        }

        let pivot = parser.position;
        let keyword_length = comparer.length;
        let keyword = Span::new(pivot, pivot + kind.name().chars().count());
        parser.jump(keyword_length);

        let body_start = parser.position;
        let body_end = parser
            .find_clause_boundary(body_start)
            .map(|(pos, _)| pos)
            .unwrap_or(parser.length);
        let body = parser.trim_span(Span::new(body_start, body_end));

        parser.jump_to(body_end);
        parser.next_non_whitespace();

        Ok((keyword, body))
    }
}
