use crate::parser::{ast::{Clause, ClauseKind}, ParseError, ParseErrorKind, QueryParser, Span};

pub struct LimitParser;

impl LimitParser {
    /// `limit <n>`: only the first word of the clause is read.
    pub fn parse(parser: &mut QueryParser) -> Result<usize, ParseError> {
        let (keyword, body) = Clause::take(parser, ClauseKind::Limit)?;

        let token_end = (body.start..body.end)
            .find(|pos| parser.text_v[*pos].is_whitespace())
            .unwrap_or(body.end);
        let token = Span::new(body.start, token_end);
        if token.is_empty() {
            return ParseError::at(ParseErrorKind::InvalidLimit, "Limit must be a number.", keyword, parser).err();
        }

        let text = parser.text_from_span(token);
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(&text)),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return ParseError::at(ParseErrorKind::InvalidLimit, "Limit must be a number.", token, parser).err();
        }
        if negative && digits.chars().any(|c| c != '0') {
            return ParseError::at(ParseErrorKind::InvalidLimit, "Limit must be zero or a positive number.", token, parser).err();
        }

        // larger than any table can be
        Ok(digits.parse::<usize>().unwrap_or(usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{ast::LimitParser, ParseErrorKind, QueryParser};

    #[test]
    pub fn test_limit() {
        let mut parser = QueryParser::new("LIMIT 10");

        let limit = LimitParser::parse(&mut parser).expect("Failed to parse limit");

        assert_eq!(limit, 10);
        assert!(parser.eof());
    }

    #[test]
    pub fn test_limit_reads_first_word() {
        let mut parser = QueryParser::new("limit 5 machines");

        assert_eq!(LimitParser::parse(&mut parser).expect("Failed to parse limit"), 5);
    }

    #[test]
    pub fn test_limit_zero() {
        let mut parser = QueryParser::new("limit 0");

        assert_eq!(LimitParser::parse(&mut parser).expect("Failed to parse limit"), 0);
    }

    #[test]
    pub fn test_limit_not_a_number() {
        let mut parser = QueryParser::new("limit ten");

        let result = LimitParser::parse(&mut parser);

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.kind, ParseErrorKind::InvalidLimit);
                assert_eq!(err.message, "Limit must be a number.");
                assert_eq!(err.text, "ten");
                assert_eq!(err.start, 6);
                assert_eq!(err.end, 9);
            },
        }
    }

    #[test]
    pub fn test_limit_overflow_saturates() {
        let mut parser = QueryParser::new("limit 99999999999999999999");

        assert_eq!(LimitParser::parse(&mut parser).expect("Failed to parse limit"), usize::MAX);

        let mut parser = QueryParser::new("limit -0");
        assert_eq!(LimitParser::parse(&mut parser).expect("Failed to parse limit"), 0);
    }

    #[test]
    pub fn test_limit_negative_overflow() {
        let mut parser = QueryParser::new("limit -99999999999999999999");

        let err = LimitParser::parse(&mut parser).expect_err("negative limit accepted");
        assert_eq!(err.message, "Limit must be zero or a positive number.");
    }

    #[test]
    pub fn test_limit_negative() {
        let mut parser = QueryParser::new("limit -3");

        let result = LimitParser::parse(&mut parser);

        match result {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.kind, ParseErrorKind::InvalidLimit);
                assert_eq!(err.message, "Limit must be zero or a positive number.");
            },
        }
    }
}
