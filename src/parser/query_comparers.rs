use crate::parser::{ast::{ClauseKind, FilterOp}, WordComparer};

#[derive(Debug)]
pub struct QueryComparers {
    pub get: WordComparer,
    pub from: WordComparer,
    pub scope_group: WordComparer,
    pub and: WordComparer,
    pub and_word: WordComparer,
    pub asc: WordComparer,
    pub desc: WordComparer,

    // clause keywords as they start a tail segment
    pub group_by: WordComparer,
    pub order_by: WordComparer,
    pub limit: WordComparer,
    pub with: WordComparer,
    pub r#where: WordComparer,

    // the same keywords as they end the previous segment
    boundaries: Vec<(ClauseKind, WordComparer)>,

    // most specific phrase first
    operators: Vec<(FilterOp, WordComparer)>,
}

impl Default for QueryComparers {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryComparers {
    pub fn new() -> Self {
        Self {
            get: WordComparer::new("get "),
            from: WordComparer::new(" from "),
            scope_group: WordComparer::new("group "),
            and: WordComparer::new(" and "),
            and_word: WordComparer::new("and").with_whitespace_postfix(),
            asc: WordComparer::new("asc").with_whitespace_postfix().with_eof(),
            desc: WordComparer::new("desc").with_whitespace_postfix().with_eof(),
            group_by: WordComparer::new(ClauseKind::GroupBy.keyword()),
            order_by: WordComparer::new(ClauseKind::OrderBy.keyword()),
            limit: WordComparer::new(ClauseKind::Limit.keyword()),
            with: WordComparer::new(ClauseKind::With.keyword()),
            r#where: WordComparer::new(ClauseKind::Where.keyword()),
            boundaries: ClauseKind::ALL
                .iter()
                .map(|kind| (*kind, WordComparer::new(&format!(" {}", kind.keyword()))))
                .collect(),
            operators: FilterOp::BY_SPECIFICITY
                .iter()
                .map(|op| (*op, WordComparer::new(op.phrase())))
                .collect(),
        }
    }

    pub fn clause(&self, kind: ClauseKind) -> &WordComparer {
        match kind {
            ClauseKind::GroupBy => &self.group_by,
            ClauseKind::OrderBy => &self.order_by,
            ClauseKind::Limit => &self.limit,
            ClauseKind::With => &self.with,
            ClauseKind::Where => &self.r#where,
        }
    }

    pub fn clause_boundaries(&self) -> &[(ClauseKind, WordComparer)] {
        &self.boundaries
    }

    pub fn operators(&self) -> &[(FilterOp, WordComparer)] {
        &self.operators
    }
}
