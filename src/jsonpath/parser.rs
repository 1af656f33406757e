//! JSONPath query string parser.

use super::ast::{Comparison, FilterExpr, JsonPath, Literal, PathSegment};
use super::error::JsonPathError;

/// Parser for JSONPath query strings.
pub struct Parser {
    input: Vec<char>,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given query string.
    pub fn new(query: &str) -> Self {
        Self {
            input: query.chars().collect(),
            position: 0,
        }
    }

    /// Parses the query string into a JsonPath.
    pub fn parse(query: &str) -> Result<JsonPath, JsonPathError> {
        let mut parser = Parser::new(query);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<JsonPath, JsonPathError> {
        let mut segments = Vec::new();

        self.skip_whitespace();

        if self.peek() != Some('$') {
            return Err(JsonPathError::InvalidSyntax {
                message: "JSONPath must start with '$'".to_string(),
            });
        }
        self.next();
        segments.push(PathSegment::Root);

        while !self.is_eof() {
            self.skip_whitespace();
            match self.peek() {
                Some('.') => {
                    self.next();
                    if self.peek() == Some('.') {
                        segments.push(self.parse_recursive_descent()?);
                    } else if self.peek() == Some('*') {
                        self.next();
                        segments.push(PathSegment::Wildcard);
                    } else {
                        let name = self.parse_identifier()?;
                        segments.push(PathSegment::Child(name));
                    }
                }
                Some('[') => {
                    segments.push(self.parse_bracket_expression()?);
                }
                Some(ch) => {
                    return Err(JsonPathError::UnexpectedToken {
                        position: self.position,
                        found: ch.to_string(),
                        expected: "'.' or '['".to_string(),
                    })
                }
                None => break,
            }
        }

        Ok(JsonPath::new(segments))
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), JsonPathError> {
        self.skip_whitespace();
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(JsonPathError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(JsonPathError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }

    /// Parses an identifier (property name).
    fn parse_identifier(&mut self) -> Result<String, JsonPathError> {
        self.skip_whitespace();
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            Err(JsonPathError::InvalidSyntax {
                message: "Expected identifier".to_string(),
            })
        } else {
            Ok(name)
        }
    }

    /// Parses recursive descent (..)
    fn parse_recursive_descent(&mut self) -> Result<PathSegment, JsonPathError> {
        self.expect('.')?;
        if self.peek() == Some('[') {
            Ok(PathSegment::RecursiveDescent(None))
        } else if self.peek() == Some('*') {
            self.next();
            Ok(PathSegment::RecursiveDescent(None))
        } else {
            let name = self.parse_identifier()?;
            Ok(PathSegment::RecursiveDescent(Some(name)))
        }
    }

    /// Parses bracket expression: [index], [start:end], ['key'], [*], [?(...)]
    fn parse_bracket_expression(&mut self) -> Result<PathSegment, JsonPathError> {
        self.expect('[')?;
        self.skip_whitespace();

        let segment = match self.peek() {
            Some('*') => {
                self.next();
                self.expect(']')?;
                PathSegment::Wildcard
            }
            Some('?') => {
                self.next();
                let filter = self.parse_filter()?;
                self.expect(']')?;
                PathSegment::Filter(filter)
            }
            Some('\'') | Some('"') => {
                let mut properties = self.parse_bracket_strings()?;
                self.expect(']')?;
                if properties.len() == 1 {
                    PathSegment::Child(properties.remove(0))
                } else {
                    PathSegment::MultiProperty(properties)
                }
            }
            Some('-') | Some('0'..='9') => {
                // a ':' before the closing bracket makes this a slice
                let looks_like_slice = self.input[self.position..]
                    .iter()
                    .take_while(|&&ch| ch != ']')
                    .any(|&ch| ch == ':');

                if looks_like_slice {
                    self.parse_slice()?
                } else {
                    let idx = self.parse_bracket_number()?;
                    self.expect(']')?;
                    PathSegment::Index(idx)
                }
            }
            Some(':') => self.parse_slice()?,
            _ => {
                return Err(JsonPathError::InvalidSyntax {
                    message: "Invalid bracket expression".to_string(),
                })
            }
        };

        Ok(segment)
    }

    /// Parses one quoted string, honouring backslash escapes.
    fn parse_quoted(&mut self) -> Result<String, JsonPathError> {
        self.skip_whitespace();
        let quote = match self.next() {
            Some(q @ ('\'' | '"')) => q,
            Some(ch) => {
                return Err(JsonPathError::UnexpectedToken {
                    position: self.position - 1,
                    found: ch.to_string(),
                    expected: "quoted string".to_string(),
                })
            }
            None => {
                return Err(JsonPathError::UnexpectedEnd {
                    expected: "quoted string".to_string(),
                })
            }
        };

        let mut value = String::new();
        loop {
            match self.next() {
                Some(ch) if ch == quote => break,
                Some('\\') => match self.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('\'') => value.push('\''),
                    Some('"') => value.push('"'),
                    Some(_) | None => {
                        return Err(JsonPathError::InvalidSyntax {
                            message: "Invalid escape sequence".to_string(),
                        })
                    }
                },
                Some(ch) => value.push(ch),
                None => {
                    return Err(JsonPathError::UnexpectedEnd {
                        expected: format!("closing quote '{}'", quote),
                    })
                }
            }
        }
        Ok(value)
    }

    /// Parses string(s) inside brackets: ['key'] or ['key1','key2']
    fn parse_bracket_strings(&mut self) -> Result<Vec<String>, JsonPathError> {
        let mut properties = vec![self.parse_quoted()?];
        loop {
            self.skip_whitespace();
            if self.peek() != Some(',') {
                break;
            }
            self.next();
            properties.push(self.parse_quoted()?);
        }
        Ok(properties)
    }

    fn parse_bracket_number(&mut self) -> Result<isize, JsonPathError> {
        self.skip_whitespace();
        let num_str = self.parse_integer_string()?;
        num_str
            .parse::<isize>()
            .map_err(|_| JsonPathError::InvalidSyntax {
                message: format!("Invalid number: {}", num_str),
            })
    }

    fn parse_integer_string(&mut self) -> Result<String, JsonPathError> {
        let mut num = String::new();
        if self.peek() == Some('-') {
            num.push('-');
            self.next();
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if num.is_empty() || num == "-" {
            Err(JsonPathError::InvalidSyntax {
                message: "Expected number".to_string(),
            })
        } else {
            Ok(num)
        }
    }

    /// Parses array slice: [start:end], [start:], [:end], [:]
    fn parse_slice(&mut self) -> Result<PathSegment, JsonPathError> {
        self.skip_whitespace();
        let start = if self.peek() == Some(':') {
            None
        } else {
            Some(self.parse_bracket_number()?)
        };

        self.expect(':')?;
        self.skip_whitespace();

        let end = if self.peek() == Some(']') {
            None
        } else {
            Some(self.parse_bracket_number()?)
        };

        self.expect(']')?;

        if let (Some(s), Some(e)) = (start, end) {
            if s >= 0 && e >= 0 && s > e {
                return Err(JsonPathError::InvalidSyntax {
                    message: format!("Invalid slice: start ({}) > end ({})", s, e),
                });
            }
        }

        Ok(PathSegment::Slice(start, end))
    }

    /// Parses the body of a filter: (@.a.b), (@.a OP literal) or (@ OP literal)
    fn parse_filter(&mut self) -> Result<FilterExpr, JsonPathError> {
        self.expect('(')?;
        self.expect('@')?;

        let mut target = Vec::new();
        while self.peek() == Some('.') {
            self.next();
            target.push(self.parse_identifier()?);
        }

        self.skip_whitespace();
        let comparison = if self.peek() == Some(')') {
            None
        } else {
            let op = self.parse_comparison()?;
            let literal = self.parse_literal()?;
            Some((op, literal))
        };

        self.expect(')')?;
        Ok(FilterExpr { target, comparison })
    }

    fn parse_comparison(&mut self) -> Result<Comparison, JsonPathError> {
        self.skip_whitespace();
        let pos = self.position;
        let first = self.next().ok_or_else(|| JsonPathError::UnexpectedEnd {
            expected: "comparison operator".to_string(),
        })?;
        let followed_by_eq = self.peek() == Some('=');
        let op = match (first, followed_by_eq) {
            ('=', true) => Comparison::Eq,
            ('!', true) => Comparison::Ne,
            ('<', true) => Comparison::Le,
            ('>', true) => Comparison::Ge,
            ('<', false) => Comparison::Lt,
            ('>', false) => Comparison::Gt,
            (ch, _) => {
                return Err(JsonPathError::UnexpectedToken {
                    position: pos,
                    found: ch.to_string(),
                    expected: "comparison operator".to_string(),
                })
            }
        };
        if followed_by_eq {
            self.next();
        }
        Ok(op)
    }

    fn parse_literal(&mut self) -> Result<Literal, JsonPathError> {
        self.skip_whitespace();
        match self.peek() {
            Some('\'') | Some('"') => Ok(Literal::String(self.parse_quoted()?)),
            Some('-') | Some('0'..='9') => {
                let mut num = String::new();
                while let Some(ch) = self.peek() {
                    if ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E') {
                        num.push(ch);
                        self.next();
                    } else {
                        break;
                    }
                }
                num.parse::<f64>()
                    .map(Literal::Number)
                    .map_err(|_| JsonPathError::InvalidSyntax {
                        message: format!("Invalid number: {}", num),
                    })
            }
            Some(_) => match self.parse_identifier()?.as_str() {
                "true" => Ok(Literal::Boolean(true)),
                "false" => Ok(Literal::Boolean(false)),
                "null" => Ok(Literal::Null),
                other => Err(JsonPathError::InvalidSyntax {
                    message: format!("Invalid literal: {}", other),
                }),
            },
            None => Err(JsonPathError::UnexpectedEnd {
                expected: "literal".to_string(),
            }),
        }
    }
}
