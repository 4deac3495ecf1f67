//! Path expression parser.

use super::ast::{JsonPath, Step};
use super::error::ParseError;

/// Parser for path expression strings.
pub struct Parser {
    input: String,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given expression.
    pub fn new(query: &str) -> Self {
        Self {
            input: query.to_string(),
            position: 0,
        }
    }

    /// Parses the expression into a JsonPath.
    pub fn parse(query: &str) -> Result<JsonPath, ParseError> {
        let mut parser = Parser::new(query);
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<JsonPath, ParseError> {
        let mut steps = Vec::new();

        self.skip_whitespace();

        // Expect root ($)
        if self.peek() != Some('$') {
            return Err(ParseError::InvalidSyntax {
                message: "JsonPath must start with '$'".to_string(),
            });
        }
        self.next();

        loop {
            self.skip_whitespace();
            let pos = self.position;
            match self.peek() {
                Some('.') => {
                    self.next();
                    self.skip_whitespace();
                    match self.peek() {
                        Some('.') => {
                            return Err(ParseError::InvalidSyntax {
                                message: "recursive descent ('..') is not supported".to_string(),
                            })
                        }
                        Some('*') => {
                            self.next();
                            steps.push(Step::Wildcard);
                        }
                        _ => {
                            let name = self.parse_identifier()?;
                            steps.push(Step::Key(name));
                        }
                    }
                }
                Some('[') => {
                    steps.push(self.parse_bracket_expression()?);
                }
                Some(ch) => {
                    return Err(ParseError::UnexpectedToken {
                        position: pos,
                        found: ch.to_string(),
                        expected: "'.' or '['".to_string(),
                    })
                }
                None => break,
            }
        }

        Ok(JsonPath::new(steps))
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Checks if we've reached the end of input.
    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        let pos = self.position; // Save position before advancing
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(ParseError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(ParseError::UnexpectedEnd {
                expected: format!("'{}'", expected),
            }),
        }
    }

    /// Parses an identifier (property name).
    fn parse_identifier(&mut self) -> Result<String, ParseError> {
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
            Err(ParseError::InvalidSyntax {
                message: "Expected identifier".to_string(),
            })
        } else {
            Ok(name)
        }
    }

    /// Parses bracket expression: [index], [start:end], ['key'], [*]
    fn parse_bracket_expression(&mut self) -> Result<Step, ParseError> {
        self.expect('[')?;
        self.skip_whitespace();

        let step = match self.peek() {
            Some('*') => {
                self.next();
                self.expect(']')?;
                Step::Wildcard
            }
            Some('\'') | Some('"') => {
                let mut keys = self.parse_bracket_string()?;
                self.expect(']')?;
                if keys.len() == 1 {
                    Step::Key(keys.remove(0))
                } else {
                    Step::Keys(keys)
                }
            }
            Some('-') | Some('0'..='9') => {
                // Check if this looks like a slice by peeking ahead for ':'
                let saved_pos = self.position;
                let mut looks_like_slice = false;
                while let Some(ch) = self.peek() {
                    match ch {
                        ':' => {
                            looks_like_slice = true;
                            break;
                        }
                        ']' => break,
                        _ => {
                            self.next();
                        }
                    }
                }
                self.position = saved_pos; // restore position

                if looks_like_slice {
                    self.parse_slice()?
                } else {
                    let idx = self.parse_bracket_number()?;
                    self.expect(']')?;
                    Step::Index(idx)
                }
            }
            Some(':') => self.parse_slice()?,
            Some('?') | Some('(') => {
                return Err(ParseError::InvalidSyntax {
                    message: "filter and script expressions are not supported".to_string(),
                })
            }
            Some(_) => {
                return Err(ParseError::InvalidSyntax {
                    message: "Invalid bracket expression".to_string(),
                })
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    expected: "bracket expression".to_string(),
                })
            }
        };

        Ok(step)
    }

    /// Parses string(s) inside brackets: ['key'] or ['key1','key2']
    fn parse_bracket_string(&mut self) -> Result<Vec<String>, ParseError> {
        let mut keys = Vec::new();
        loop {
            self.skip_whitespace();
            let pos = self.position;
            let quote = match self.next() {
                Some(q @ ('\'' | '"')) => q,
                Some(ch) => {
                    return Err(ParseError::UnexpectedToken {
                        position: pos,
                        found: ch.to_string(),
                        expected: "quoted key".to_string(),
                    })
                }
                None => {
                    return Err(ParseError::UnexpectedEnd {
                        expected: "quoted key".to_string(),
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
                            return Err(ParseError::InvalidSyntax {
                                message: "Invalid escape sequence".to_string(),
                            })
                        }
                    },
                    Some(ch) => value.push(ch),
                    None => {
                        return Err(ParseError::UnexpectedEnd {
                            expected: format!("closing quote '{}'", quote),
                        })
                    }
                }
            }
            keys.push(value);

            self.skip_whitespace();
            if self.peek() == Some(',') {
                self.next();
            } else {
                break;
            }
        }
        Ok(keys)
    }

    /// Parses a number inside brackets
    fn parse_bracket_number(&mut self) -> Result<isize, ParseError> {
        self.skip_whitespace();
        let num_str = self.parse_number_string()?;
        num_str
            .parse::<isize>()
            .map_err(|_| ParseError::InvalidSyntax {
                message: format!("Invalid number: {}", num_str),
            })
    }

    /// Parses a number as a string
    fn parse_number_string(&mut self) -> Result<String, ParseError> {
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
            Err(ParseError::InvalidSyntax {
                message: "Expected number".to_string(),
            })
        } else {
            Ok(num)
        }
    }

    /// Parses array slice: [start:end], [start:], [:end], [:]
    fn parse_slice(&mut self) -> Result<Step, ParseError> {
        self.skip_whitespace();
        let start = if self.peek() == Some(':') {
            None
        } else {
            Some(self.parse_bracket_number()?)
        };

        self.expect(':')?;
        self.skip_whitespace();

        let end = if self.peek() == Some(']') || self.is_eof() {
            None
        } else {
            Some(self.parse_bracket_number()?)
        };

        self.expect(']')?;

        // Validate slice bounds
        if let (Some(s), Some(e)) = (start, end) {
            if s >= 0 && e >= 0 && s > e {
                return Err(ParseError::InvalidSyntax {
                    message: format!("Invalid slice: start ({}) > end ({})", s, e),
                });
            }
        }

        Ok(Step::Slice(start, end))
    }
}
