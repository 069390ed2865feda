use std::fmt;

use crate::{database::Catalog, parser::{ParseError, ParseErrorKind, QueryParser, Span, Warning}};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    #[default]
    All,
    Group,
}

impl ScopeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScopeKind::All => "all",
            ScopeKind::Group => "group",
        }
    }
}

/// The `from ...` part: every machine, or one group by canonical name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub value: Option<String>,
    pub span: Span,
}

impl Scope {
    pub fn all(span: Span) -> Self {
        Self { kind: ScopeKind::All, value: None, span }
    }

    pub fn group(name: String, span: Span) -> Self {
        Self { kind: ScopeKind::Group, value: Some(name), span }
    }

    /// Group name when the scope names a non-empty group.
    pub fn group_name(&self) -> Option<&str> {
        match self.kind {
            ScopeKind::Group => self.value.as_deref().filter(|v| !v.is_empty()),
            ScopeKind::All => None,
        }
    }

    /// Group name, or the scope kind when there is none.
    pub fn label(&self) -> String {
        self.value
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(self.kind.name())
            .to_string()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub struct ScopeParser;

impl ScopeParser {
    /// Reads the scope after ` from `, up to the first clause keyword.
    ///
    /// `group <name>` (name optionally double-quoted) resolves through the
    /// catalog's alias table; `all` selects everything. Any other text is
    /// taken as `all` and reported through `warnings`.
    pub fn parse(parser: &mut QueryParser, catalog: &Catalog, warnings: &mut Vec<Warning>) -> Result<Scope, ParseError> {
        let from = parser.position;
        parser.jump(parser.comparers.from.length);
        parser.next_non_whitespace();
        if parser.eof() {
            return ParseError::at(
                ParseErrorKind::MalformedQuery,
                "Provide a scope after 'from'.",
                Span::new(from + 1, from + parser.comparers.from.length - 1),
                parser,
            ).err();
        }

        let scope_start = parser.position;
        let scope_end = parser
            .find_clause_boundary(scope_start)
            .map(|(pos, _)| pos)
            .unwrap_or(parser.length);
        let span = parser.trim_span(Span::new(scope_start, scope_end));

        parser.jump_to(scope_end);
        parser.next_non_whitespace();

        let group = &parser.comparers.scope_group;
        if group.compare_at(parser, span.start) && span.start + group.length <= span.end {
            let name_span = parser.trim_span(Span::new(span.start + group.length, span.end));
            let mut name = parser.text_from_span(name_span);
            if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
                name = name[1..name.len() - 1].to_string();
            } else if name == "\"" {
                name.clear();
            }
            return Ok(Scope::group(catalog.resolve_group(&name), span));
        }

        let text = parser.text_from_span(span);
        if !text.eq_ignore_ascii_case("all") {
            warnings.push(Warning::new(
                format!("Unrecognized scope '{}'; using all machines.", text),
                span,
            ));
        }

        Ok(Scope::all(span))
    }
}

#[cfg(test)]
mod tests {
    use crate::{database::Catalog, parser::{ParseErrorKind, QueryParser, Scope, ScopeKind, ScopeParser, Span}};

    fn parse(text: &str) -> (Scope, Vec<crate::parser::Warning>, QueryParser) {
        let mut parser = QueryParser::new(text);
        parser.jump(1);
        let mut warnings = vec![];
        let scope = ScopeParser::parse(&mut parser, Catalog::standard(), &mut warnings).expect("Failed to parse scope");
        (scope, warnings, parser)
    }

    #[test]
    pub fn test_scope_all() {
        let (scope, warnings, parser) = parse("x from all");

        assert_eq!(scope.kind, ScopeKind::All);
        assert_eq!(scope.label(), "all");
        assert!(warnings.is_empty());
        assert!(parser.eof());
    }

    #[test]
    pub fn test_scope_group_alias() {
        let (scope, _, parser) = parse("x from group Finance with role equals \"x\"");

        assert_eq!(scope.kind, ScopeKind::Group);
        assert_eq!(scope.group_name(), Some("Finance Workstations"));
        assert_eq!(scope.span, Span::new(7, 20));
        assert_eq!(parser.position, 21);
    }

    #[test]
    pub fn test_scope_quoted_group_passes_through() {
        let (scope, _, _) = parse("x from group \"Operations\" limit 1");

        assert_eq!(scope.group_name(), Some("Operations"));
    }

    #[test]
    pub fn test_scope_quoted_alias_resolves() {
        let (scope, _, _) = parse("x from GROUP \"engineering lab\"");

        assert_eq!(scope.group_name(), Some("Engineering Lab"));
    }

    #[test]
    pub fn test_scope_unrecognized_warns() {
        let (scope, warnings, _) = parse("x from everything");

        assert_eq!(scope.kind, ScopeKind::All);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].start, 7);
        assert_eq!(warnings[0].end, 17);
    }

    #[test]
    pub fn test_scope_bare_group_word_is_not_a_group() {
        let (scope, warnings, _) = parse("x from group where role equals \"x\"");

        assert_eq!(scope.kind, ScopeKind::All);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    pub fn test_scope_missing() {
        let mut parser = QueryParser::new("x from  ");
        parser.jump(1);
        let mut warnings = vec![];

        // trailing blanks are outside the cursor, so ` from ` does not fit
        assert!(!parser.comparers.from.compare(&parser));

        // cut the range right after ` from `
        let mut parser = QueryParser::new("x from  ,");
        parser.jump(1);
        parser.length = 7;
        let result = ScopeParser::parse(&mut parser, Catalog::standard(), &mut warnings);

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.kind, ParseErrorKind::MalformedQuery);
                assert_eq!(err.message, "Provide a scope after 'from'.");
                assert_eq!(err.text, "from");
            },
        }
    }
}
