use crate::parser::QueryParser;

/// Case-insensitive matcher for a fixed keyword or phrase.
///
/// Spaces inside the word are literal: `" from "` only matches a single
/// blank on each side, which is what keeps `platform` from ending a column
/// list.
#[derive(Debug, Default, Clone)]
pub struct WordComparer {
    pub length: usize,
    pub word: Vec<char>,
    whitespace_postfix: bool,
    eof: bool,
}

impl WordComparer {
    pub fn new(word: &str) -> Self {
        let word: Vec<char> = word.to_lowercase().chars().collect();
        Self {
            length: word.len(),
            word,
            whitespace_postfix: false,
            eof: false,
        }
    }

    pub fn is_block_delimiter(ch: char) -> bool {
        ch.is_whitespace()
    }

    pub fn reach_eof(&self, parser: &QueryParser, position: usize) -> bool {
        position + self.length >= parser.length
    }

    pub fn compare(&self, parser: &QueryParser) -> bool {
        self.compare_at(parser, parser.position)
    }

    pub fn compare_at(&self, parser: &QueryParser, position: usize) -> bool {
        if position + self.length > parser.length {
            return false;
        }

        let same = self
            .word
            .iter()
            .enumerate()
            .all(|(i, w)| parser.text_v[position + i].to_lowercase().eq(std::iter::once(*w)));
        if !same {
            return false;
        }

        if self.reach_eof(parser, position) {
            return self.eof || !self.whitespace_postfix;
        }

        if !self.whitespace_postfix {
            return true;
        }

        Self::is_block_delimiter(parser.text_v[position + self.length])
    }

    pub fn with_eof(mut self) -> Self { self.eof = true; self }
    pub fn with_whitespace_postfix(mut self) -> Self { self.whitespace_postfix = true; self }
}
