use serde::{Deserialize, Serialize};

use crate::parser::{ast::ClauseKind, QueryComparers};

/// Half-open character range `[start, end)` into the question text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end: end.max(start) }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Character cursor over a question.
///
/// Leading and trailing whitespace are outside the cursor's range
/// (`[start, length)`), but every offset it hands out is an index into
/// the untrimmed text, so spans can be shown against what the user typed.
#[derive(Debug, Default)]
pub struct QueryParser {
    pub position: usize,
    pub start: usize,
    pub length: usize,
    pub text_v: Vec<char>,
    pub text: String,

    pub comparers: QueryComparers,
}

impl QueryParser {
    pub fn new(question: &str) -> Self {
        let text_v: Vec<char> = question.chars().collect();
        let start = text_v.iter().position(|c| !c.is_whitespace()).unwrap_or(text_v.len());
        let length = text_v
            .iter()
            .rposition(|c| !c.is_whitespace())
            .map(|idx| idx + 1)
            .unwrap_or(start);

        Self {
            position: start,
            start,
            length,
            text_v,
            text: question.to_string(),
            comparers: QueryComparers::new(),
        }
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> char {
        self.char_at(self.position)
    }

    /// Char at `pos` inside the trimmed range, `'\0'` outside it.
    pub fn char_at(&self, pos: usize) -> char {
        if pos < self.length {
            return self.text_v[pos];
        }

        '\0'
    }

    pub fn next(&mut self) {
        if self.position < self.length {
            self.position += 1;
        }
    }

    pub fn next_non_whitespace(&mut self) {
        while !self.eof() && self.current().is_whitespace() {
            self.next();
        }
    }

    pub fn jump(&mut self, ahead: usize) {
        self.position = (self.position + ahead).min(self.length);
    }

    pub fn jump_to(&mut self, position: usize) {
        self.position = position.min(self.length);
    }

    pub fn text_from_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.text_v.len());
        if start >= end {
            return String::new();
        }
        self.text_v[start..end].iter().collect()
    }

    pub fn text_from_span(&self, span: Span) -> String {
        self.text_from_range(span.start, span.end)
    }

    /// Shrinks `span` so it neither starts nor ends on whitespace.
    pub fn trim_span(&self, span: Span) -> Span {
        let mut start = span.start;
        let mut end = span.end.min(self.text_v.len());
        while start < end && self.text_v[start].is_whitespace() {
            start += 1;
        }
        while end > start && self.text_v[end - 1].is_whitespace() {
            end -= 1;
        }
        Span::new(start, end)
    }

    /// Leftmost clause boundary (`" group by "`, `" where "`, ...) at or
    /// after `from`. Candidates are compared at every position, so the
    /// earliest keyword wins regardless of which one it is.
    ///
    /// The ` with ` of the `starts with` operator is not a boundary.
    pub fn find_clause_boundary(&self, from: usize) -> Option<(usize, ClauseKind)> {
        (from..self.length).find_map(|pos| {
            self.comparers
                .clause_boundaries()
                .iter()
                .find(|(kind, comparer)| {
                    comparer.compare_at(self, pos) && !(*kind == ClauseKind::With && self.follows_starts(pos))
                })
                .map(|(kind, _)| (pos, *kind))
        })
    }

    /// True when the word right before `pos` is `starts`.
    fn follows_starts(&self, pos: usize) -> bool {
        const WORD: &str = "starts";
        let len = WORD.len();
        if pos < len {
            return false;
        }
        let word_start = pos - len;
        let at_word_edge = word_start == 0 || self.text_v[word_start - 1].is_whitespace();
        at_word_edge && self.text_from_range(word_start, pos).eq_ignore_ascii_case(WORD)
    }
}
