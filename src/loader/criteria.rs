//! Scoring rule parser
//!
//! Rule text on the point side of a card is a tiny language:
//!
//! ```text
//! MOST ONION = 10              FEWEST TOTAL VEGETABLE = 7
//! COMPLETE SET = 12            TOMATO: EVEN=7, ODD=3
//! CARROT + ONION = 5           3 / VEGETABLE TYPE >= 2
//! 5 / MISSING VEGETABLE TYPE   4/LETTUCE, -2/TOMATO, -2/CABBAGE
//! ```
//!
//! The lexer makes a single pass producing identifiers, numbers and the
//! symbols `= : , / + - >`. The parser dispatches on the first token and
//! either consumes every token or fails; there is no partial result.

use crate::core::{Criterion, VegetableType, VEGETABLE_TYPES};
use std::fmt;
use thiserror::Error;

/// Why a rule string was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriterionError {
    #[error("unknown character '{character}' at offset {offset} in '{text}'")]
    UnknownCharacter {
        character: char,
        offset: usize,
        text: String,
    },

    #[error("number {digits} is out of range in '{text}'")]
    NumberOutOfRange { digits: String, text: String },

    #[error("expected {expected}, got {found} in '{text}'")]
    Unexpected {
        expected: String,
        found: String,
        text: String,
    },
}

/// Lexical token of the rule language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Identifier(String),
    Number(i32),
    Equal,
    Colon,
    Comma,
    Slash,
    Plus,
    Minus,
    Greater,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => f.write_str(name),
            Token::Number(n) => write!(f, "{n}"),
            Token::Equal => f.write_str("'='"),
            Token::Colon => f.write_str("':'"),
            Token::Comma => f.write_str("','"),
            Token::Slash => f.write_str("'/'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Greater => f.write_str("'>'"),
        }
    }
}

/// Split rule text into tokens, skipping spaces
pub fn tokenize(text: &str) -> Result<Vec<Token>, CriterionError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let token = match c {
            ' ' => continue,
            '=' => Token::Equal,
            ':' => Token::Colon,
            ',' => Token::Comma,
            '/' => Token::Slash,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '>' => Token::Greater,
            c if c.is_ascii_alphabetic() => {
                let mut word = c.to_string();
                while let Some(&(_, next)) = chars.peek() {
                    if !next.is_ascii_alphabetic() {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                Token::Identifier(word)
            }
            c if c.is_ascii_digit() => {
                let mut digits = c.to_string();
                while let Some(&(_, next)) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    digits.push(next);
                    chars.next();
                }
                let value = digits
                    .parse::<i32>()
                    .map_err(|_| CriterionError::NumberOutOfRange {
                        digits: digits.clone(),
                        text: text.to_string(),
                    })?;
                Token::Number(value)
            }
            character => {
                return Err(CriterionError::UnknownCharacter {
                    character,
                    offset,
                    text: text.to_string(),
                })
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Parse one rule string into a [`Criterion`]
pub fn parse_criterion(text: &str) -> Result<Criterion, CriterionError> {
    let tokens = tokenize(text)?;
    let mut parser = RuleParser {
        text,
        tokens,
        pos: 0,
    };
    let criterion = parser.rule()?;
    parser.finish()?;
    Ok(criterion)
}

/// Recursive-descent cursor over the token list
struct RuleParser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> RuleParser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expected: impl Into<String>, found: Option<&Token>) -> CriterionError {
        CriterionError::Unexpected {
            expected: expected.into(),
            found: found.map_or_else(|| "end of input".to_string(), |t| t.to_string()),
            text: self.text.to_string(),
        }
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Identifier(word)) if word == keyword)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), CriterionError> {
        match self.advance() {
            Some(Token::Identifier(word)) if word == keyword => Ok(()),
            other => Err(self.unexpected(keyword, other.as_ref())),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), CriterionError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            other => Err(self.unexpected(expected.to_string(), other.as_ref())),
        }
    }

    /// A number, optionally preceded by `-`
    fn number(&mut self) -> Result<i32, CriterionError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Minus) => match self.advance() {
                Some(Token::Number(n)) => Ok(-n),
                other => Err(self.unexpected("a number", other.as_ref())),
            },
            other => Err(self.unexpected("a number or '-'", other.as_ref())),
        }
    }

    fn vegetable(&mut self) -> Result<VegetableType, CriterionError> {
        match self.advance() {
            Some(Token::Identifier(word)) => word
                .parse()
                .map_err(|_| self.unexpected("a vegetable type", Some(&Token::Identifier(word)))),
            other => Err(self.unexpected("a vegetable type", other.as_ref())),
        }
    }

    /// `= N` tail shared by most rule shapes
    fn points(&mut self) -> Result<i32, CriterionError> {
        self.expect(Token::Equal)?;
        self.number()
    }

    fn finish(&self) -> Result<(), CriterionError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(self.unexpected("end of input", Some(token))),
        }
    }

    fn rule(&mut self) -> Result<Criterion, CriterionError> {
        match self.peek().cloned() {
            Some(Token::Identifier(word)) if word == "MOST" || word == "FEWEST" => {
                self.advance();
                self.extreme_rule(word == "MOST")
            }
            Some(Token::Identifier(word)) if word == "COMPLETE" => {
                self.advance();
                self.expect_keyword("SET")?;
                Ok(Criterion::CompleteSet {
                    points: self.points()?,
                })
            }
            Some(Token::Identifier(word)) if word.parse::<VegetableType>().is_ok() => {
                self.vegetable_rule()
            }
            Some(Token::Number(_)) | Some(Token::Minus) => self.per_rule(),
            other => Err(self.unexpected(
                "MOST, FEWEST, COMPLETE, a vegetable type or a number",
                other.as_ref(),
            )),
        }
    }

    /// After `MOST` / `FEWEST`
    fn extreme_rule(&mut self, most: bool) -> Result<Criterion, CriterionError> {
        if self.peek_keyword("TOTAL") {
            self.advance();
            self.expect_keyword("VEGETABLE")?;
            let points = self.points()?;
            return Ok(if most {
                Criterion::MostTotal { points }
            } else {
                Criterion::FewestTotal { points }
            });
        }

        let names_vegetable = matches!(
            self.peek(),
            Some(Token::Identifier(word)) if word.parse::<VegetableType>().is_ok()
        );
        if !names_vegetable {
            return Err(self.unexpected("TOTAL or a vegetable type", self.peek()));
        }
        let vegetable = self.vegetable()?;
        let points = self.points()?;
        Ok(if most {
            Criterion::Most { vegetable, points }
        } else {
            Criterion::Fewest { vegetable, points }
        })
    }

    /// `<VEG>: EVEN=N, ODD=N` or `<VEG> + <VEG> ... = N`
    fn vegetable_rule(&mut self) -> Result<Criterion, CriterionError> {
        let first = self.vegetable()?;
        match self.advance() {
            Some(Token::Colon) => {
                self.expect_keyword("EVEN")?;
                let even = self.points()?;
                self.expect(Token::Comma)?;
                self.expect_keyword("ODD")?;
                let odd = self.points()?;
                Ok(Criterion::EvenOdd {
                    vegetable: first,
                    even,
                    odd,
                })
            }
            Some(Token::Plus) => {
                let mut required = [0u32; VEGETABLE_TYPES];
                required[first.index()] += 1;
                loop {
                    let vegetable = self.vegetable()?;
                    required[vegetable.index()] += 1;
                    if self.peek() == Some(&Token::Plus) {
                        self.advance();
                    } else {
                        break;
                    }
                }
                let points = self.points()?;
                Ok(Criterion::SumOfSet { required, points })
            }
            other => Err(self.unexpected("':' or '+'", other.as_ref())),
        }
    }

    /// Rules starting with `N /`
    fn per_rule(&mut self) -> Result<Criterion, CriterionError> {
        let mut points = self.number()?;
        self.expect(Token::Slash)?;

        if self.peek_keyword("VEGETABLE") {
            self.advance();
            self.expect_keyword("TYPE")?;
            self.expect(Token::Greater)?;
            self.expect(Token::Equal)?;
            let threshold = self.number()?;
            return Ok(Criterion::PerTypeAtLeast { threshold, points });
        }

        if self.peek_keyword("MISSING") {
            self.advance();
            self.expect_keyword("VEGETABLE")?;
            self.expect_keyword("TYPE")?;
            return Ok(Criterion::PerMissingType { points });
        }

        let mut weights = [0i32; VEGETABLE_TYPES];
        loop {
            let vegetable = self.vegetable()?;
            weights[vegetable.index()] = points;
            if self.peek() != Some(&Token::Comma) {
                break;
            }
            self.advance();
            points = self.number()?;
            self.expect(Token::Slash)?;
        }
        Ok(Criterion::PerVegetable { weights })
    }
}
